// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;

use crate::analytics::categories::category_spending;
use crate::analytics::ledger::{ledger_summary, payment_method_usage, reconcile_balances};
use crate::analytics::overview::{PeriodTotals, analytics_overview, monthly_growth};
use crate::analytics::trend::monthly_trend;
use crate::error::Result;
use crate::models::{
    AnalyticsData, BalanceReconciliation, Card, CategorySpending, DashboardStats, LedgerSummary,
    MonthlyData, PaymentMethodUsage, Transaction,
};
use crate::store::{TransactionStore, TxQuery};
use crate::window::Window;

/// Home view totals.
///
/// `total_balance` is the sum of the given cards' stored balances; it is not
/// derived from the transactions.
pub fn dashboard_stats(
    current: &[Transaction],
    previous: &[Transaction],
    active_cards: &[Card],
) -> DashboardStats {
    let cur = PeriodTotals::of(current);
    let last = PeriodTotals::of(previous);
    DashboardStats {
        total_balance: active_cards.iter().map(|c| c.balance).sum(),
        total_income: cur.income,
        total_expenses: cur.expenses,
        monthly_growth: monthly_growth(&cur, &last),
        transaction_count: current.len(),
        active_cards: active_cards.len(),
    }
}

/// Dashboard figures for `window` (default: this month so far). Growth is
/// measured against the equal-length window before it, which for the default
/// window is the tail of last month rather than the whole month.
pub fn get_dashboard_stats(
    store: &dyn TransactionStore,
    user_id: &str,
    window: Option<Window>,
    now: NaiveDateTime,
) -> Result<DashboardStats> {
    let current = window.unwrap_or_else(|| Window::current_month(now));
    let current_txs = store.transactions(user_id, &TxQuery::in_window(current))?;
    let previous_txs = store.transactions(user_id, &TxQuery::in_window(current.previous()))?;
    let cards = store.active_cards(user_id)?;
    Ok(dashboard_stats(&current_txs, &previous_txs, &cards))
}

/// One read of a user's transactions and active cards from which every
/// aggregate is derived.
///
/// The separate `get_*` functions each issue their own reads, so a write
/// landing between them can make two aggregates disagree. Everything computed
/// from one `Snapshot` sees the same rows.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub user_id: String,
    pub transactions: Vec<Transaction>,
    pub cards: Vec<Card>,
    pub now: NaiveDateTime,
}

impl Snapshot {
    pub fn load(store: &dyn TransactionStore, user_id: &str, now: NaiveDateTime) -> Result<Self> {
        let transactions = store.transactions(user_id, &TxQuery::all())?;
        let cards = store.active_cards(user_id)?;
        tracing::debug!(
            user_id,
            transactions = transactions.len(),
            cards = cards.len(),
            "snapshot loaded"
        );
        Ok(Snapshot {
            user_id: user_id.to_string(),
            transactions,
            cards,
            now,
        })
    }

    fn select(&self, query: TxQuery) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect()
    }

    fn current_window(&self, window: Option<Window>) -> Window {
        window.unwrap_or_else(|| Window::current_month(self.now))
    }

    pub fn monthly_trend(&self, window: Option<Window>) -> Vec<MonthlyData> {
        monthly_trend(&self.select(TxQuery::all().within(window)))
    }

    pub fn category_spending(&self, window: Option<Window>) -> Vec<CategorySpending> {
        let current = self.current_window(window);
        category_spending(
            &self.select(TxQuery::in_window(current)),
            &self.select(TxQuery::in_window(current.previous())),
        )
    }

    pub fn overview(&self, window: Option<Window>) -> AnalyticsData {
        let current = self.current_window(window);
        analytics_overview(
            &self.select(TxQuery::all().within(window)),
            &self.select(TxQuery::in_window(current)),
            &self.select(TxQuery::in_window(current.previous())),
            self.cards.len(),
        )
    }

    pub fn dashboard(&self, window: Option<Window>) -> DashboardStats {
        let current = self.current_window(window);
        dashboard_stats(
            &self.select(TxQuery::in_window(current)),
            &self.select(TxQuery::in_window(current.previous())),
            &self.cards,
        )
    }

    pub fn payment_methods(&self, window: Option<Window>) -> Vec<PaymentMethodUsage> {
        payment_method_usage(&self.select(TxQuery::all().within(window)))
    }

    pub fn ledger_summary(&self) -> LedgerSummary {
        ledger_summary(&self.transactions, self.now)
    }

    pub fn reconciliation(&self) -> BalanceReconciliation {
        reconcile_balances(&self.transactions, &self.cards)
    }
}
