// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use kudi::analytics::overview::{PeriodTotals, monthly_growth};
use kudi::analytics::{
    analytics_overview, category_spending, dashboard_stats, health_grade, health_score,
    ledger_summary, monthly_trend, payment_method_usage, reconcile_balances,
};
use kudi::models::{Card, CardKind, MonthlyData, Transaction, TxType};
use rust_decimal::Decimal;
use serde_json::json;

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn tx(t: TxType, amount: i64, date: &str) -> Transaction {
    Transaction::new("u1", t, dec(amount), date)
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn card(balance: i64) -> Card {
    Card {
        id: 1,
        user_id: "u1".into(),
        kind: CardKind::Debit,
        last4: "1234".into(),
        bank: "GTBank".into(),
        balance: dec(balance),
        is_active: true,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn single_month_scenario() {
    let txs = vec![
        tx(TxType::Income, 100000, "2024-01-15"),
        tx(TxType::Expense, 40000, "2024-01-20").with_category("Bills"),
    ];

    assert_eq!(
        monthly_trend(&txs),
        vec![MonthlyData {
            month: "Jan 2024".into(),
            income: dec(100000),
            expenses: dec(40000),
        }]
    );

    let cats = category_spending(&txs, &[]);
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].category, "Bills");
    assert_eq!(cats[0].amount, dec(40000));
    assert!(close(cats[0].percentage, 100.0));
    assert_eq!(cats[0].trend, "");
    assert_eq!(cats[0].color, "bg-yellow-400");
    assert_eq!(cats[0].hex, "#facc15");
}

#[test]
fn trend_fills_empty_months() {
    let txs = vec![
        tx(TxType::Expense, 500, "2024-02-03"),
        tx(TxType::Income, 1000, "2023-11-20"),
    ];
    let trend = monthly_trend(&txs);
    let months: Vec<&str> = trend.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, ["Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024"]);
    assert_eq!(trend[1].income, Decimal::ZERO);
    assert_eq!(trend[1].expenses, Decimal::ZERO);
    assert_eq!(trend[2].income, Decimal::ZERO);
    assert_eq!(trend[3].expenses, dec(500));
}

#[test]
fn trend_keeps_only_last_twelve_months() {
    let txs = vec![
        tx(TxType::Income, 1, "2023-01-10"),
        tx(TxType::Income, 2, "2024-02-10"),
    ];
    let trend = monthly_trend(&txs);
    assert_eq!(trend.len(), 12);
    assert_eq!(trend[0].month, "Mar 2023");
    assert_eq!(trend[11].month, "Feb 2024");
    assert_eq!(trend[11].income, dec(2));
    // January 2023 was dropped with its income
    assert!(trend.iter().all(|m| m.income != dec(1)));
}

#[test]
fn trend_skips_transfers_and_undated_rows() {
    let mut fallback = tx(TxType::Income, 300, "not a date");
    fallback.created_at = Some("2024-03-06 08:00:00".into());
    let mut created_only = tx(TxType::Expense, 50, "");
    created_only.date = None;
    created_only.created_at = Some("2024-03-05T10:00:00Z".into());
    let mut undated = tx(TxType::Income, 999, "");
    undated.date = None;

    let txs = vec![
        tx(TxType::Transfer, 10000, "2024-03-01"),
        fallback,
        created_only,
        undated,
    ];
    assert_eq!(
        monthly_trend(&txs),
        vec![MonthlyData {
            month: "Mar 2024".into(),
            income: dec(300),
            expenses: dec(50),
        }]
    );
}

#[test]
fn empty_input_degrades_to_neutral_values() {
    assert!(monthly_trend(&[]).is_empty());
    assert!(category_spending(&[], &[]).is_empty());

    let overview = analytics_overview(&[], &[], &[], 0);
    assert_eq!(overview.top_spending_category, "N/A");
    assert_eq!(overview.top_spending_amount, Decimal::ZERO);
    assert_eq!(overview.health_score, 0);
    assert_eq!(overview.health_grade, "F");
    assert_eq!(overview.monthly_growth, None);
    assert_eq!(overview.savings_rate, 0.0);
    assert_eq!(overview.avg_monthly_income, Decimal::ZERO);
}

#[test]
fn category_breakdown_sorts_shares_and_trends() {
    let current = vec![
        tx(TxType::Expense, 100, "2024-02-02").with_category("Food"),
        tx(TxType::Expense, 50, "2024-02-03").with_category("Food"),
        tx(TxType::Expense, 50, "2024-02-04").with_category("Rent"),
        tx(TxType::Expense, 25, "2024-02-05"),
        tx(TxType::Expense, 0, "2024-02-06").with_category("Gadgets"),
        tx(TxType::Income, 9000, "2024-02-01").with_category("Salary"),
    ];
    let previous = vec![
        tx(TxType::Expense, 100, "2024-01-02").with_category("Food"),
        tx(TxType::Expense, 100, "2024-01-03").with_category("Rent"),
    ];
    let cats = category_spending(&current, &previous);

    let names: Vec<&str> = cats.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, ["Food", "Rent", "Others", "Gadgets"]);
    assert_eq!(cats[0].trend, "+50.0%");
    assert_eq!(cats[1].trend, "-50.0%");
    assert_eq!(cats[2].trend, "");
    assert_eq!(cats[3].hex, "#64748b");

    let total: f64 = cats.iter().map(|c| c.percentage).sum();
    assert!(close(total, 100.0));
}

#[test]
fn category_breakdown_is_idempotent() {
    let current = vec![
        tx(TxType::Expense, 10, "2024-02-02").with_category("Shopping"),
        tx(TxType::Expense, 10, "2024-02-03").with_category("Bills"),
        tx(TxType::Expense, 10, "2024-02-04").with_category("Food"),
    ];
    assert_eq!(
        category_spending(&current, &[]),
        category_spending(&current, &[])
    );
}

#[test]
fn equal_spend_is_listed_alphabetically() {
    let current = vec![
        tx(TxType::Expense, 10, "2024-02-02").with_category("Shopping"),
        tx(TxType::Expense, 10, "2024-02-03").with_category("Bills"),
        tx(TxType::Expense, 10, "2024-02-04").with_category("Food"),
    ];
    let names: Vec<String> = category_spending(&current, &[])
        .into_iter()
        .map(|c| c.category)
        .collect();
    assert_eq!(names, ["Bills", "Food", "Shopping"]);
    assert_eq!(
        analytics_overview(&current, &current, &[], 0).top_spending_category,
        "Bills"
    );
}

#[test]
fn growth_is_none_without_positive_previous_net() {
    let current = vec![tx(TxType::Income, 50000, "2024-02-10")];
    let previous_zero = vec![
        tx(TxType::Income, 1000, "2024-01-10"),
        tx(TxType::Expense, 1000, "2024-01-11"),
    ];
    assert_eq!(
        analytics_overview(&current, &current, &previous_zero, 0).monthly_growth,
        None
    );
    assert_eq!(analytics_overview(&current, &current, &[], 0).monthly_growth, None);

    let previous = vec![tx(TxType::Income, 40000, "2024-01-10")];
    let g = analytics_overview(&current, &current, &previous, 0).monthly_growth;
    assert!(close(g.unwrap(), 25.0));
}

#[test]
fn growth_is_clamped() {
    let big = PeriodTotals {
        income: dec(5000),
        expenses: Decimal::ZERO,
    };
    let small = PeriodTotals {
        income: dec(1000),
        expenses: Decimal::ZERO,
    };
    let loss = PeriodTotals {
        income: Decimal::ZERO,
        expenses: dec(8000),
    };
    assert_eq!(monthly_growth(&big, &small), Some(100.0));
    assert_eq!(monthly_growth(&loss, &small), Some(-100.0));
    assert_eq!(monthly_growth(&small, &loss), None);
}

#[test]
fn ratios_do_not_overflow_on_a_tiny_baseline() {
    let huge: Decimal = "100000000000000000000".parse().unwrap();
    let tiny = Decimal::new(1, 10);

    let current = vec![Transaction::new("u1", TxType::Expense, huge, "2024-02-10").with_category("Bills")];
    let previous = vec![Transaction::new("u1", TxType::Expense, tiny, "2024-01-10").with_category("Bills")];
    let cats = category_spending(&current, &previous);
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].percentage, 100.0);
    assert!(cats[0].trend.starts_with('+'));

    let rich = PeriodTotals {
        income: huge,
        expenses: Decimal::ZERO,
    };
    let poor = PeriodTotals {
        income: tiny,
        expenses: Decimal::ZERO,
    };
    assert_eq!(monthly_growth(&rich, &poor), Some(100.0));

    let overspent = PeriodTotals {
        income: tiny,
        expenses: huge,
    };
    let rate = overspent.savings_rate();
    assert!(rate.is_finite() && rate < -100.0);
    assert_eq!(health_score(rate, tiny, huge), 10);

    let income_now = vec![Transaction::new("u1", TxType::Income, huge, "2024-02-10")];
    let income_before = vec![Transaction::new("u1", TxType::Income, tiny, "2024-01-10")];
    let overview = analytics_overview(&income_now, &income_now, &income_before, 0);
    assert!(overview.income_growth.is_finite() && overview.income_growth > 100.0);

    let ledger = vec![
        Transaction::new("u1", TxType::Income, tiny, "2024-01-10"),
        Transaction::new("u1", TxType::Expense, huge, "2024-03-01"),
    ];
    let summary = ledger_summary(&ledger, ts("2024-03-15 12:00:00"));
    assert!(summary.balance_change.is_finite() && summary.balance_change < 0.0);
    assert!(summary.savings_rate.is_finite() && summary.savings_rate < 0.0);
}

#[test]
fn health_score_tiers_and_adjustments() {
    // >= 60%, low ratio bonus clamped at 100
    assert_eq!(health_score(65.0, dec(100), dec(30)), 100);
    // >= 40%, ratio 0.55 leaves it alone
    assert_eq!(health_score(45.0, dec(100), dec(55)), 80);
    // >= 20%
    assert_eq!(health_score(25.0, dec(100), dec(75)), 60);
    // >= 0%, ratio 0.9 penalised
    assert_eq!(health_score(10.0, dec(100), dec(90)), 30);
    // negative savings
    assert_eq!(health_score(-10.0, dec(100), dec(110)), 10);
    // no income at all
    assert_eq!(health_score(0.0, Decimal::ZERO, dec(10)), 30);
    assert_eq!(health_score(0.0, Decimal::ZERO, Decimal::ZERO), 40);
}

#[test]
fn health_grades_follow_the_tier_table() {
    let cases = [
        (100, "A+"),
        (95, "A+"),
        (94, "A"),
        (85, "A"),
        (80, "B+"),
        (75, "B+"),
        (70, "B"),
        (60, "C+"),
        (50, "C"),
        (40, "D"),
        (35, "D"),
        (30, "F"),
        (0, "F"),
    ];
    for (score, grade) in cases {
        assert_eq!(health_grade(score), grade, "score {}", score);
    }
}

#[test]
fn overview_combines_averages_growth_and_health() {
    let jan = vec![
        tx(TxType::Income, 100000, "2024-01-05"),
        tx(TxType::Expense, 40000, "2024-01-20").with_category("Bills"),
    ];
    let feb = vec![
        tx(TxType::Income, 100000, "2024-02-05"),
        tx(TxType::Expense, 70000, "2024-02-20").with_category("Rent"),
    ];
    let all: Vec<Transaction> = jan.iter().chain(feb.iter()).cloned().collect();

    let d = analytics_overview(&all, &feb, &jan, 2);
    assert_eq!(d.avg_monthly_income, dec(100000));
    assert_eq!(d.avg_monthly_expenses, dec(55000));
    assert!(close(d.savings_rate, 45.0));
    assert!(close(d.monthly_growth.unwrap(), -50.0));
    assert!(close(d.income_growth, 0.0));
    assert!(close(d.savings_growth, -50.0));
    assert_eq!(d.top_spending_category, "Rent");
    assert_eq!(d.top_spending_amount, dec(70000));
    assert_eq!(d.transaction_count, 4);
    assert_eq!(d.cards_used, 2);
    assert_eq!(d.health_score, 80);
    assert_eq!(d.health_grade, "B+");
}

#[test]
fn income_growth_without_baseline() {
    let current = vec![tx(TxType::Income, 10, "2024-02-05")];
    assert_eq!(analytics_overview(&current, &current, &[], 0).income_growth, 100.0);
    let spend = vec![tx(TxType::Expense, 10, "2024-02-05")];
    assert_eq!(analytics_overview(&spend, &spend, &[], 0).income_growth, 0.0);
}

#[test]
fn zero_income_never_produces_nan() {
    let spend = vec![tx(TxType::Expense, 500, "2024-02-05").with_category("Food")];
    let d = analytics_overview(&spend, &spend, &[], 0);
    assert_eq!(d.savings_rate, 0.0);
    assert_eq!(d.savings_growth, 0.0);
    assert_eq!(d.health_score, 30);
    assert_eq!(d.health_grade, "F");
}

#[test]
fn dashboard_balance_comes_from_cards() {
    let current = vec![
        tx(TxType::Income, 2000, "2024-02-05"),
        tx(TxType::Expense, 500, "2024-02-06"),
        tx(TxType::Transfer, 700, "2024-02-07"),
    ];
    let previous = vec![tx(TxType::Income, 1000, "2024-01-05")];
    let stats = dashboard_stats(&current, &previous, &[card(3000), card(1500)]);
    assert_eq!(stats.total_balance, dec(4500));
    assert_eq!(stats.total_income, dec(2000));
    assert_eq!(stats.total_expenses, dec(500));
    assert_eq!(stats.transaction_count, 3);
    assert_eq!(stats.active_cards, 2);
    assert!(close(stats.monthly_growth.unwrap(), 50.0));

    assert_eq!(dashboard_stats(&current, &[], &[]).monthly_growth, None);
}

#[test]
fn payment_methods_are_counted_with_default() {
    let txs = vec![
        tx(TxType::Expense, 1, "2024-02-01").with_payment_method("card"),
        tx(TxType::Expense, 1, "2024-02-02").with_payment_method("card"),
        tx(TxType::Income, 1, "2024-02-03").with_payment_method("card"),
        tx(TxType::Expense, 1, "2024-02-04"),
    ];
    let usage = payment_method_usage(&txs);
    assert_eq!(usage.len(), 2);
    assert_eq!(usage[0].method, "card");
    assert_eq!(usage[0].count, 3);
    assert!(close(usage[0].percentage, 75.0));
    assert_eq!(usage[1].method, "Other");
    assert!(payment_method_usage(&[]).is_empty());
}

#[test]
fn ledger_summary_compares_calendar_months() {
    let txs = vec![
        tx(TxType::Income, 1000, "2024-01-10"),
        tx(TxType::Income, 1000, "2024-02-10"),
        tx(TxType::Expense, 200, "2024-02-11"),
        tx(TxType::Transfer, 100, "2024-02-29 18:30:00"),
        tx(TxType::Income, 1500, "2024-03-02"),
        tx(TxType::Expense, 300, "2024-03-03"),
    ];
    let s = ledger_summary(&txs, ts("2024-03-15 12:00:00"));
    assert_eq!(s.total_income, dec(3500));
    assert_eq!(s.total_expenses, dec(600));
    assert_eq!(s.total_balance, dec(2900));
    assert!((s.balance_change - 1200.0 / 1700.0 * 100.0).abs() < 1e-6);
    assert!(close(s.income_change, 50.0));
    assert!(close(s.expense_change, 0.0));
    assert!((s.savings_rate - 2900.0 / 3500.0 * 100.0).abs() < 1e-6);
    assert_eq!(s.transaction_count, 6);
}

#[test]
fn ledger_summary_without_history() {
    let s = ledger_summary(
        &[tx(TxType::Income, 10, "2024-03-02")],
        ts("2024-03-15 12:00:00"),
    );
    assert_eq!(s.balance_change, 100.0);
    assert_eq!(s.income_change, 0.0);
}

#[test]
fn reconciliation_reports_drift() {
    let mut undated = tx(TxType::Expense, 100, "");
    undated.date = None;
    let txs = vec![tx(TxType::Income, 3000, "2024-03-02"), undated];
    let rec = reconcile_balances(&txs, &[card(5000)]);
    assert_eq!(rec.card_balance, dec(5000));
    assert_eq!(rec.ledger_balance, dec(2900));
    assert_eq!(rec.drift, dec(2100));
    assert_eq!(rec.undated_transactions, 1);
    assert!(!rec.is_consistent());

    let balanced = reconcile_balances(&[tx(TxType::Income, 50, "2024-03-02")], &[card(50)]);
    assert!(balanced.is_consistent());
}

#[test]
fn results_serialize_for_json_output() {
    let t = tx(TxType::Expense, 5, "2024-02-01").with_category("Food");
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["type"], json!("expense"));
    assert_eq!(v["status"], json!("completed"));
    assert_eq!(v["category"], json!("Food"));

    let stats = serde_json::to_value(dashboard_stats(&[], &[], &[])).unwrap();
    assert_eq!(stats["monthly_growth"], json!(null));
    assert_eq!(stats["transaction_count"], json!(0));
}
