// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::utils::parse_timestamp;

/// Category used when a transaction carries none.
pub const DEFAULT_CATEGORY: &str = "Others";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
    Transfer,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
            TxType::Transfer => "transfer",
        }
    }
}

impl FromStr for TxType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            "transfer" => Ok(TxType::Transfer),
            _ => Err(Error::InvalidType(s.to_string())),
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Completed => "completed",
            TxStatus::Pending => "pending",
            TxStatus::Failed => "failed",
        }
    }
}

impl FromStr for TxStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(TxStatus::Completed),
            "pending" => Ok(TxStatus::Pending),
            "failed" => Ok(TxStatus::Failed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ledger entry owned by a single user.
///
/// `date` is the economic date of the transaction and `created_at` the time
/// the record was written. Both are kept as the raw stored text; use
/// [`Transaction::effective_date`] to get a usable timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub amount: Decimal,
    pub category: Option<String>,
    pub description: String,
    pub date: Option<String>,
    pub created_at: Option<String>,
    pub status: TxStatus,
    pub reference: Option<String>,
    pub payment_method: Option<String>,
}

impl Transaction {
    /// A completed transaction with only the fields the aggregators read.
    pub fn new(user_id: &str, tx_type: TxType, amount: Decimal, date: &str) -> Self {
        Transaction {
            id: 0,
            user_id: user_id.to_string(),
            tx_type,
            amount,
            category: None,
            description: String::new(),
            date: Some(date.to_string()),
            created_at: None,
            status: TxStatus::Completed,
            reference: None,
            payment_method: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_status(mut self, status: TxStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_payment_method(mut self, method: &str) -> Self {
        self.payment_method = Some(method.to_string());
        self
    }

    /// `date` when present and parseable, otherwise `created_at`.
    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        self.date
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.created_at.as_deref().and_then(parse_timestamp))
    }

    pub fn category_or_default(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => DEFAULT_CATEGORY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Debit,
    Credit,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Debit => "debit",
            CardKind::Credit => "credit",
        }
    }
}

impl FromStr for CardKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debit" => Ok(CardKind::Debit),
            "credit" => Ok(CardKind::Credit),
            _ => Err(Error::InvalidCardKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: CardKind,
    pub last4: String,
    pub bank: String,
    pub balance: Decimal, // stored balance, not derived from transactions
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyData {
    pub month: String, // "Jan 2024"
    pub income: Decimal,
    pub expenses: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: Decimal,
    pub percentage: f64,
    pub color: String,
    pub hex: String,
    /// Signed change against the previous window, e.g. `+12.5%`; empty when
    /// the previous window has no spend in this category.
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsData {
    /// `None` when the previous window's net was not positive.
    pub monthly_growth: Option<f64>,
    pub avg_monthly_income: Decimal,
    pub avg_monthly_expenses: Decimal,
    pub savings_rate: f64,
    pub top_spending_category: String,
    pub top_spending_amount: Decimal,
    pub transaction_count: usize,
    pub cards_used: usize,
    pub income_growth: f64,
    pub savings_growth: f64,
    pub health_score: u8,
    pub health_grade: String,
}

impl Default for AnalyticsData {
    fn default() -> Self {
        AnalyticsData {
            monthly_growth: None,
            avg_monthly_income: Decimal::ZERO,
            avg_monthly_expenses: Decimal::ZERO,
            savings_rate: 0.0,
            top_spending_category: "N/A".to_string(),
            top_spending_amount: Decimal::ZERO,
            transaction_count: 0,
            cards_used: 0,
            income_growth: 0.0,
            savings_growth: 0.0,
            health_score: 0,
            health_grade: "F".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Sum of active cards' stored balances.
    pub total_balance: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub monthly_growth: Option<f64>,
    pub transaction_count: usize,
    pub active_cards: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethodUsage {
    pub method: String,
    pub count: usize,
    pub percentage: f64,
}

/// All-time and month-over-month figures derived purely from the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub total_balance: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance_change: f64,
    pub income_change: f64,
    pub expense_change: f64,
    pub savings_rate: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceReconciliation {
    pub card_balance: Decimal,
    pub ledger_balance: Decimal,
    /// `card_balance - ledger_balance`
    pub drift: Decimal,
    pub undated_transactions: usize,
}

impl BalanceReconciliation {
    pub fn is_consistent(&self) -> bool {
        self.drift.is_zero()
    }
}
