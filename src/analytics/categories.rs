// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{CategorySpending, DEFAULT_CATEGORY, Transaction, TxType};
use crate::store::{TransactionStore, TxQuery};
use crate::utils::{fmt_signed_percent, percent_change, ratio};
use crate::window::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryColor {
    pub color: &'static str,
    pub hex: &'static str,
}

static CATEGORY_COLORS: Lazy<HashMap<&'static str, CategoryColor>> = Lazy::new(|| {
    [
        ("Investment", "bg-purple-500", "#8b5cf6"),
        ("Food & Dining", "bg-blue-500", "#3b82f6"),
        ("Food", "bg-blue-400", "#60a5fa"),
        ("Groceries", "bg-green-500", "#22c55e"),
        ("Rent", "bg-orange-600", "#ea580c"),
        ("Bills", "bg-yellow-400", "#facc15"),
        ("Utilities", "bg-emerald-500", "#10b981"),
        ("Transportation", "bg-orange-500", "#f97316"),
        ("Transfer", "bg-cyan-500", "#06b6d4"),
        ("Exchange", "bg-fuchsia-500", "#d946ef"),
        ("Entertainment", "bg-pink-500", "#ec4899"),
        ("Shopping", "bg-indigo-500", "#6366f1"),
        ("Healthcare", "bg-red-500", "#ef4444"),
        ("Education", "bg-yellow-500", "#eab308"),
        ("Other Expenses", "bg-slate-400", "#94a3b8"),
        (DEFAULT_CATEGORY, "bg-slate-500", "#64748b"),
    ]
    .into_iter()
    .map(|(name, color, hex)| (name, CategoryColor { color, hex }))
    .collect()
});

/// Display colour of a category; unknown categories share the "Others" colour.
pub fn category_color(category: &str) -> CategoryColor {
    CATEGORY_COLORS
        .get(category)
        .or_else(|| CATEGORY_COLORS.get(DEFAULT_CATEGORY))
        .copied()
        .unwrap_or(CategoryColor {
            color: "bg-slate-500",
            hex: "#64748b",
        })
}

/// Expense totals per category, in category-name order.
pub fn expense_by_category(transactions: &[Transaction]) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.tx_type == TxType::Expense) {
        *totals
            .entry(tx.category_or_default().to_string())
            .or_insert(Decimal::ZERO) += tx.amount;
    }
    totals
}

/// Spend per category in `current`, largest first, each with its share of
/// the total and its change against `previous`.
///
/// Only expenses are counted, whatever the slices contain. Categories with
/// equal amounts are listed alphabetically.
pub fn category_spending(
    current: &[Transaction],
    previous: &[Transaction],
) -> Vec<CategorySpending> {
    let totals = expense_by_category(current);
    let last = expense_by_category(previous);
    let total: Decimal = totals.values().copied().sum();

    let mut items: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category, amount)| {
            let percentage = if total > Decimal::ZERO {
                ratio(amount, total) * 100.0
            } else {
                0.0
            };
            let previous_amount = last.get(&category).copied().unwrap_or(Decimal::ZERO);
            let trend = percent_change(amount, previous_amount)
                .map(fmt_signed_percent)
                .unwrap_or_default();
            let colors = category_color(&category);
            CategorySpending {
                category,
                amount,
                percentage,
                color: colors.color.to_string(),
                hex: colors.hex.to_string(),
                trend,
            }
        })
        .collect();

    // stable: equal amounts stay in name order
    items.sort_by(|a, b| b.amount.cmp(&a.amount));
    items
}

/// Category spending for `window` (default: this month so far) compared with
/// the equal-length window right before it.
///
/// For the default window the baseline is the same number of days at the end
/// of last month, not the whole of last month.
pub fn get_category_spending(
    store: &dyn TransactionStore,
    user_id: &str,
    window: Option<Window>,
    now: NaiveDateTime,
) -> Result<Vec<CategorySpending>> {
    let current = window.unwrap_or_else(|| Window::current_month(now));
    let previous = current.previous();
    let current_txs = store.transactions(
        user_id,
        &TxQuery::in_window(current).of_type(TxType::Expense),
    )?;
    let previous_txs = store.transactions(
        user_id,
        &TxQuery::in_window(previous).of_type(TxType::Expense),
    )?;
    Ok(category_spending(&current_txs, &previous_txs))
}
