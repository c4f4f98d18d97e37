// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{MonthlyData, Transaction, TxType};
use crate::store::{TransactionStore, TxQuery};
use crate::window::Window;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Most recent months kept in a trend.
pub const MAX_TREND_MONTHS: usize = 12;

pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???");
    format!("{} {}", name, year)
}

/// Monthly income/expense series from the earliest to the latest observed
/// month, with empty months filled in, limited to the last twelve months.
///
/// Transfers are not counted. Transactions without a usable date are skipped.
pub fn monthly_trend(transactions: &[Transaction]) -> Vec<MonthlyData> {
    let mut buckets: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for tx in transactions {
        let Some(date) = tx.effective_date() else {
            tracing::warn!(id = tx.id, "transaction has no usable date, skipped from trend");
            continue;
        };
        let entry = buckets.entry((date.year(), date.month())).or_default();
        match tx.tx_type {
            TxType::Income => entry.0 += tx.amount,
            TxType::Expense => entry.1 += tx.amount,
            TxType::Transfer => {}
        }
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut result = Vec::new();
    let (mut y, mut m) = first;
    while (y, m) <= last {
        let (income, expenses) = buckets.get(&(y, m)).copied().unwrap_or_default();
        result.push(MonthlyData {
            month: month_label(y, m),
            income,
            expenses,
        });
        m += 1;
        if m > 12 {
            m = 1;
            y += 1;
        }
    }

    let skip = result.len().saturating_sub(MAX_TREND_MONTHS);
    tracing::debug!(months = result.len(), dropped = skip, "monthly trend computed");
    result.split_off(skip)
}

/// Trend over the user's transactions, all time or inside `window`.
pub fn get_monthly_trend(
    store: &dyn TransactionStore,
    user_id: &str,
    window: Option<Window>,
) -> Result<Vec<MonthlyData>> {
    let txs = store.transactions(user_id, &TxQuery::all().within(window))?;
    Ok(monthly_trend(&txs))
}
