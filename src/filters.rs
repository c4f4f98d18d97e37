// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtering and sorting of an already-loaded transaction list.

use std::cmp::Ordering;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{Duration, NaiveDateTime};

use crate::models::{Transaction, TxStatus, TxType};

/// Relative date range ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    SevenDays,
    #[default]
    ThirtyDays,
    NinetyDays,
    OneYear,
    All,
}

impl DateRange {
    pub fn days(&self) -> Option<i64> {
        match self {
            DateRange::SevenDays => Some(7),
            DateRange::ThirtyDays => Some(30),
            DateRange::NinetyDays => Some(90),
            DateRange::OneYear => Some(365),
            DateRange::All => None,
        }
    }

    pub fn start(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        self.days()
            .map(|d| now.checked_sub_signed(Duration::days(d)).unwrap_or(NaiveDateTime::MIN))
    }
}

impl FromStr for DateRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7days" => Ok(DateRange::SevenDays),
            "30days" => Ok(DateRange::ThirtyDays),
            "90days" => Ok(DateRange::NinetyDays),
            "1year" => Ok(DateRange::OneYear),
            "all" => Ok(DateRange::All),
            other => Err(anyhow!(
                "Unknown range '{}' (use 7days|30days|90days|1year|all)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Largest first.
    Amount,
    /// Alphabetical by type name.
    Type,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "type" => Ok(SortKey::Type),
            other => Err(anyhow!("Unknown sort '{}' (use date|amount|type)", other)),
        }
    }
}

/// `None` on a field means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilters {
    pub tx_type: Option<TxType>,
    pub category: Option<String>,
    pub status: Option<TxStatus>,
    pub search: String,
    pub range: DateRange,
    pub sort: SortKey,
}

impl TransactionFilters {
    pub fn matches(&self, tx: &Transaction, range_start: Option<NaiveDateTime>) -> bool {
        if let Some(start) = range_start {
            match tx.effective_date() {
                Some(d) if d >= start => {}
                _ => return false,
            }
        }
        if self.tx_type.is_some_and(|t| t != tx.tx_type) {
            return false;
        }
        if let Some(cat) = &self.category {
            if !tx.category_or_default().eq_ignore_ascii_case(cat.trim()) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != tx.status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !tx.description.to_lowercase().contains(&needle)
            && !tx.category_or_default().to_lowercase().contains(&needle)
        {
            return false;
        }
        true
    }
}

pub fn sort_by_key(txs: &mut [Transaction], key: SortKey) {
    match key {
        SortKey::Amount => txs.sort_by(|a, b| b.amount.cmp(&a.amount)),
        SortKey::Type => txs.sort_by(|a, b| a.tx_type.as_str().cmp(b.tx_type.as_str())),
        SortKey::Date => txs.sort_by(|a, b| match (a.effective_date(), b.effective_date()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
}

/// The filtered and sorted subset of `transactions` as seen at `now`.
pub fn apply_filters(
    transactions: &[Transaction],
    filters: &TransactionFilters,
    now: NaiveDateTime,
) -> Vec<Transaction> {
    let range_start = filters.range.start(now);
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| filters.matches(t, range_start))
        .cloned()
        .collect();
    sort_by_key(&mut out, filters.sort);
    out
}

/// The `n` most recent transactions, ignoring any filter.
pub fn most_recent(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut out = transactions.to_vec();
    sort_by_key(&mut out, SortKey::Date);
    out.truncate(n);
    out
}
