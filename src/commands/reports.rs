// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{user_for, window_arg};
use crate::config::Config;
use crate::hooks::{
    Aggregate, AggregateHook, CategoryBreakdown, Dashboard, LedgerStats, MonthlyTrend, Overview,
    PaymentMethods,
};
use crate::store::{SqliteStore, TransactionStore};
use crate::utils::{
    fmt_growth, fmt_money, fmt_signed_percent, get_display_currency, maybe_print_json,
    pretty_table,
};
use crate::window::Window;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let Some((name, sub)) = m.subcommand() else {
        return Ok(());
    };
    let user = user_for(conn, cfg, sub)?;
    let window = window_arg(sub)?;
    let store = SqliteStore::new(conn);
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ccy = get_display_currency(conn)?;
    match name {
        "trend" => {
            let data = load::<MonthlyTrend>(&store, &user, window)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows = data
                    .iter()
                    .map(|m| {
                        vec![
                            m.month.clone(),
                            fmt_money(&m.income, &ccy),
                            fmt_money(&m.expenses, &ccy),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Month", "Income", "Expenses"], rows));
            }
        }
        "categories" => {
            let data = load::<CategoryBreakdown>(&store, &user, window)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.category.clone(),
                            fmt_money(&c.amount, &ccy),
                            format!("{:.1}%", c.percentage),
                            if c.trend.is_empty() { "-".to_string() } else { c.trend.clone() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Spent", "Share", "Trend"], rows)
                );
            }
        }
        "overview" => {
            let d = load::<Overview>(&store, &user, window)?;
            if !maybe_print_json(json_flag, jsonl_flag, &d)? {
                let rows = vec![
                    vec!["Net growth".into(), fmt_growth(d.monthly_growth)],
                    vec!["Avg monthly income".into(), fmt_money(&d.avg_monthly_income, &ccy)],
                    vec!["Avg monthly expenses".into(), fmt_money(&d.avg_monthly_expenses, &ccy)],
                    vec!["Savings rate".into(), format!("{:.1}%", d.savings_rate)],
                    vec!["Income growth".into(), fmt_signed_percent(d.income_growth)],
                    vec!["Savings growth".into(), fmt_signed_percent(d.savings_growth)],
                    vec![
                        "Top spending".into(),
                        format!("{} ({})", d.top_spending_category, fmt_money(&d.top_spending_amount, &ccy)),
                    ],
                    vec!["Transactions".into(), d.transaction_count.to_string()],
                    vec!["Cards used".into(), d.cards_used.to_string()],
                    vec![
                        "Health".into(),
                        format!("{}/100 ({})", d.health_score, d.health_grade),
                    ],
                ];
                println!("{}", pretty_table(&["Metric", "Value"], rows));
            }
        }
        "dashboard" => {
            let d = load::<Dashboard>(&store, &user, window)?;
            if !maybe_print_json(json_flag, jsonl_flag, &d)? {
                let rows = vec![
                    vec!["Total balance (cards)".into(), fmt_money(&d.total_balance, &ccy)],
                    vec!["Income".into(), fmt_money(&d.total_income, &ccy)],
                    vec!["Expenses".into(), fmt_money(&d.total_expenses, &ccy)],
                    vec!["Net growth".into(), fmt_growth(d.monthly_growth)],
                    vec!["Transactions".into(), d.transaction_count.to_string()],
                    vec!["Active cards".into(), d.active_cards.to_string()],
                ];
                println!("{}", pretty_table(&["Metric", "Value"], rows));
            }
        }
        "summary" => {
            let s = load::<LedgerStats>(&store, &user, window)?;
            if !maybe_print_json(json_flag, jsonl_flag, &s)? {
                let rows = vec![
                    vec![
                        "Ledger balance".into(),
                        format!("{} ({})", fmt_money(&s.total_balance, &ccy), fmt_signed_percent(s.balance_change)),
                    ],
                    vec![
                        "Total income".into(),
                        format!("{} ({} this month)", fmt_money(&s.total_income, &ccy), fmt_signed_percent(s.income_change)),
                    ],
                    vec![
                        "Total outflow".into(),
                        format!("{} ({} this month)", fmt_money(&s.total_expenses, &ccy), fmt_signed_percent(s.expense_change)),
                    ],
                    vec!["Savings rate".into(), format!("{:.1}%", s.savings_rate)],
                    vec!["Transactions".into(), s.transaction_count.to_string()],
                ];
                println!("{}", pretty_table(&["Metric", "Value"], rows));
            }
        }
        "payment-methods" => {
            let data = load::<PaymentMethods>(&store, &user, window)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows = data
                    .iter()
                    .map(|u| {
                        vec![
                            u.method.clone(),
                            u.count.to_string(),
                            format!("{:.1}%", u.percentage),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Method", "Count", "Share"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Run one hook to completion, turning a recorded error into `Err`.
pub fn load<A: Aggregate>(
    store: &dyn TransactionStore,
    user: &str,
    window: Option<Window>,
) -> Result<A::Output> {
    let mut hook = AggregateHook::<A>::new(store, Some(user)).with_window(window);
    hook.refresh();
    let state = hook.into_state();
    if let Some(e) = state.error {
        return Err(anyhow!("Failed to load {}: {}", A::NAME, e));
    }
    Ok(state.data)
}
