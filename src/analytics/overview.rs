// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;

use crate::analytics::categories::expense_by_category;
use crate::error::Result;
use crate::models::{AnalyticsData, Transaction, TxType};
use crate::store::{TransactionStore, TxQuery};
use crate::utils::{percent_change, ratio};
use crate::window::Window;

/// Income and expense sums of one period. Transfers count as neither.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl PeriodTotals {
    pub fn of(transactions: &[Transaction]) -> Self {
        let mut totals = PeriodTotals::default();
        for tx in transactions {
            match tx.tx_type {
                TxType::Income => totals.income += tx.amount,
                TxType::Expense => totals.expenses += tx.amount,
                TxType::Transfer => {}
            }
        }
        totals
    }

    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }

    /// Share of income kept, in percent; zero without income.
    pub fn savings_rate(&self) -> f64 {
        if self.income > Decimal::ZERO {
            ratio(self.net(), self.income) * 100.0
        } else {
            0.0
        }
    }
}

/// Net growth against the previous period, clamped to ±100%.
///
/// `None` means the previous period's net was not positive, so there is no
/// baseline to compare with.
pub fn monthly_growth(current: &PeriodTotals, previous: &PeriodTotals) -> Option<f64> {
    percent_change(current.net(), previous.net()).map(|g| g.clamp(-100.0, 100.0))
}

/// Heuristic 0–100 score from the savings rate and the expense/income ratio.
pub fn health_score(savings_rate: f64, avg_income: Decimal, avg_expenses: Decimal) -> u8 {
    let mut score: i32 = if savings_rate >= 60.0 {
        100
    } else if savings_rate >= 40.0 {
        80
    } else if savings_rate >= 20.0 {
        60
    } else if savings_rate >= 0.0 {
        40
    } else {
        20
    };
    if avg_income > Decimal::ZERO {
        let expense_ratio = ratio(avg_expenses, avg_income);
        if expense_ratio < 0.5 {
            score += 10;
        }
        if expense_ratio > 0.8 {
            score -= 10;
        }
    } else if avg_expenses > Decimal::ZERO {
        // spending with no income at all
        score -= 10;
    }
    score.clamp(0, 100) as u8
}

pub fn health_grade(score: u8) -> &'static str {
    match score {
        95.. => "A+",
        85..=94 => "A",
        75..=84 => "B+",
        65..=74 => "B",
        55..=64 => "C+",
        45..=54 => "C",
        35..=44 => "D",
        _ => "F",
    }
}

/// Overview metrics.
///
/// * `all` feeds the monthly averages and the transaction count.
/// * `current` and `previous` are the two equal-length comparison windows.
/// * `active_cards` is reported as `cards_used`.
///
/// When two categories tie for the top spend, the alphabetically first wins.
pub fn analytics_overview(
    all: &[Transaction],
    current: &[Transaction],
    previous: &[Transaction],
    active_cards: usize,
) -> AnalyticsData {
    let cur = PeriodTotals::of(current);
    let last = PeriodTotals::of(previous);

    let mut months: BTreeMap<(i32, u32), PeriodTotals> = BTreeMap::new();
    for tx in all {
        let Some(date) = tx.effective_date() else {
            continue;
        };
        let entry = months.entry((date.year(), date.month())).or_default();
        match tx.tx_type {
            TxType::Income => entry.income += tx.amount,
            TxType::Expense => entry.expenses += tx.amount,
            TxType::Transfer => {}
        }
    }
    let month_count = Decimal::from(months.len().max(1));
    let total_income: Decimal = months.values().map(|m| m.income).sum();
    let total_expenses: Decimal = months.values().map(|m| m.expenses).sum();
    let avg_monthly_income = total_income / month_count;
    let avg_monthly_expenses = total_expenses / month_count;
    let savings_rate = PeriodTotals {
        income: avg_monthly_income,
        expenses: avg_monthly_expenses,
    }
    .savings_rate();

    let income_growth = match percent_change(cur.income, last.income) {
        Some(g) => g,
        None if cur.income > Decimal::ZERO => 100.0,
        None => 0.0,
    };
    let last_rate = last.savings_rate();
    let savings_growth = if last_rate > 0.0 {
        (cur.savings_rate() - last_rate) / last_rate * 100.0
    } else {
        0.0
    };

    let mut top_spending_category = "N/A".to_string();
    let mut top_spending_amount = Decimal::ZERO;
    for (category, amount) in expense_by_category(current) {
        if amount > top_spending_amount {
            top_spending_amount = amount;
            top_spending_category = category;
        }
    }

    let health_score = if current.is_empty() {
        0
    } else {
        health_score(savings_rate, avg_monthly_income, avg_monthly_expenses)
    };

    tracing::debug!(
        all = all.len(),
        current = current.len(),
        previous = previous.len(),
        health_score,
        "analytics overview computed"
    );

    AnalyticsData {
        monthly_growth: monthly_growth(&cur, &last),
        avg_monthly_income,
        avg_monthly_expenses,
        savings_rate,
        top_spending_category,
        top_spending_amount,
        transaction_count: all.len(),
        cards_used: active_cards,
        income_growth,
        savings_growth,
        health_score,
        health_grade: health_grade(health_score).to_string(),
    }
}

/// Overview for `window`, or for all time compared month-to-date when no
/// window is given.
pub fn get_analytics_overview(
    store: &dyn TransactionStore,
    user_id: &str,
    window: Option<Window>,
    now: NaiveDateTime,
) -> Result<AnalyticsData> {
    let current = window.unwrap_or_else(|| Window::current_month(now));
    let all = store.transactions(user_id, &TxQuery::all().within(window))?;
    let current_txs = store.transactions(user_id, &TxQuery::in_window(current))?;
    let previous_txs = store.transactions(user_id, &TxQuery::in_window(current.previous()))?;
    let cards = store.active_cards(user_id)?;
    Ok(analytics_overview(
        &all,
        &current_txs,
        &previous_txs,
        cards.len(),
    ))
}
