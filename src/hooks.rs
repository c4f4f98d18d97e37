// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Stateful fetch-then-aggregate bindings.
//!
//! A hook ties a user identity and a store to one aggregate and keeps the
//! last result together with loading and error state. A failed fetch leaves
//! the previous data in place and records the error message.

use std::marker::PhantomData;

use chrono::{Local, NaiveDateTime};

use crate::analytics;
use crate::error::Result;
use crate::filters::{DateRange, SortKey, TransactionFilters, apply_filters, most_recent};
use crate::models::{
    AnalyticsData, CategorySpending, DashboardStats, LedgerSummary, MonthlyData,
    PaymentMethodUsage, Transaction, TxStatus, TxType,
};
use crate::store::{TransactionStore, TxQuery};
use crate::window::Window;

pub type Clock = fn() -> NaiveDateTime;

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// An aggregate a hook can load.
pub trait Aggregate {
    type Output: Clone + Default;

    const NAME: &'static str;

    fn fetch(
        store: &dyn TransactionStore,
        user_id: &str,
        window: Option<Window>,
        now: NaiveDateTime,
    ) -> Result<Self::Output>;
}

pub struct MonthlyTrend;

impl Aggregate for MonthlyTrend {
    type Output = Vec<MonthlyData>;
    const NAME: &'static str = "monthly_trend";

    fn fetch(
        store: &dyn TransactionStore,
        user_id: &str,
        window: Option<Window>,
        _now: NaiveDateTime,
    ) -> Result<Self::Output> {
        analytics::get_monthly_trend(store, user_id, window)
    }
}

pub struct CategoryBreakdown;

impl Aggregate for CategoryBreakdown {
    type Output = Vec<CategorySpending>;
    const NAME: &'static str = "category_spending";

    fn fetch(
        store: &dyn TransactionStore,
        user_id: &str,
        window: Option<Window>,
        now: NaiveDateTime,
    ) -> Result<Self::Output> {
        analytics::get_category_spending(store, user_id, window, now)
    }
}

pub struct Overview;

impl Aggregate for Overview {
    type Output = AnalyticsData;
    const NAME: &'static str = "analytics_overview";

    fn fetch(
        store: &dyn TransactionStore,
        user_id: &str,
        window: Option<Window>,
        now: NaiveDateTime,
    ) -> Result<Self::Output> {
        analytics::get_analytics_overview(store, user_id, window, now)
    }
}

pub struct Dashboard;

impl Aggregate for Dashboard {
    type Output = DashboardStats;
    const NAME: &'static str = "dashboard_stats";

    fn fetch(
        store: &dyn TransactionStore,
        user_id: &str,
        window: Option<Window>,
        now: NaiveDateTime,
    ) -> Result<Self::Output> {
        analytics::get_dashboard_stats(store, user_id, window, now)
    }
}

pub struct PaymentMethods;

impl Aggregate for PaymentMethods {
    type Output = Vec<PaymentMethodUsage>;
    const NAME: &'static str = "payment_method_usage";

    fn fetch(
        store: &dyn TransactionStore,
        user_id: &str,
        window: Option<Window>,
        _now: NaiveDateTime,
    ) -> Result<Self::Output> {
        analytics::get_payment_method_usage(store, user_id, window)
    }
}

/// All-time ledger figures; ignores the window.
pub struct LedgerStats;

impl Aggregate for LedgerStats {
    type Output = LedgerSummary;
    const NAME: &'static str = "ledger_summary";

    fn fetch(
        store: &dyn TransactionStore,
        user_id: &str,
        _window: Option<Window>,
        now: NaiveDateTime,
    ) -> Result<Self::Output> {
        let txs = store.transactions(user_id, &TxQuery::all())?;
        Ok(analytics::ledger_summary(&txs, now))
    }
}

pub struct AggregateHook<'s, A: Aggregate> {
    store: &'s dyn TransactionStore,
    user_id: Option<String>,
    window: Option<Window>,
    clock: Clock,
    state: Resource<A::Output>,
    _aggregate: PhantomData<A>,
}

pub type MonthlyTrendHook<'s> = AggregateHook<'s, MonthlyTrend>;
pub type CategorySpendingHook<'s> = AggregateHook<'s, CategoryBreakdown>;
pub type AnalyticsOverviewHook<'s> = AggregateHook<'s, Overview>;
pub type DashboardStatsHook<'s> = AggregateHook<'s, Dashboard>;
pub type PaymentMethodHook<'s> = AggregateHook<'s, PaymentMethods>;
pub type LedgerSummaryHook<'s> = AggregateHook<'s, LedgerStats>;

impl<'s, A: Aggregate> AggregateHook<'s, A> {
    /// Nothing is fetched until [`refresh`](Self::refresh) is called.
    pub fn new(store: &'s dyn TransactionStore, user_id: Option<&str>) -> Self {
        AggregateHook {
            store,
            user_id: user_id.map(str::to_string),
            window: None,
            clock: local_now,
            state: Resource {
                data: A::Output::default(),
                is_loading: user_id.is_some(),
                error: None,
            },
            _aggregate: PhantomData,
        }
    }

    pub fn with_window(mut self, window: Option<Window>) -> Self {
        self.window = window;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Change the window and reload.
    pub fn set_window(&mut self, window: Option<Window>) -> &Resource<A::Output> {
        self.window = window;
        self.refresh()
    }

    pub fn refresh(&mut self) -> &Resource<A::Output> {
        let Some(user_id) = self.user_id.as_deref() else {
            self.state.is_loading = false;
            return &self.state;
        };
        self.state.is_loading = true;
        self.state.error = None;
        match A::fetch(self.store, user_id, self.window, (self.clock)()) {
            Ok(data) => self.state.data = data,
            Err(e) => {
                tracing::error!(aggregate = A::NAME, user_id, "failed to load: {}", e);
                self.state.error = Some(e.to_string());
            }
        }
        self.state.is_loading = false;
        &self.state
    }

    pub fn state(&self) -> &Resource<A::Output> {
        &self.state
    }

    pub fn data(&self) -> &A::Output {
        &self.state.data
    }

    pub fn into_state(self) -> Resource<A::Output> {
        self.state
    }
}

/// A user's full transaction list plus client-side filters.
///
/// Changing a filter recomputes the visible list from the loaded rows
/// without going back to the store.
pub struct TransactionsView<'s> {
    store: &'s dyn TransactionStore,
    user_id: Option<String>,
    clock: Clock,
    all: Vec<Transaction>,
    filters: TransactionFilters,
    visible: Vec<Transaction>,
    is_loading: bool,
    error: Option<String>,
}

impl<'s> TransactionsView<'s> {
    pub fn new(store: &'s dyn TransactionStore, user_id: Option<&str>) -> Self {
        TransactionsView {
            store,
            user_id: user_id.map(str::to_string),
            clock: local_now,
            all: Vec::new(),
            filters: TransactionFilters::default(),
            visible: Vec::new(),
            is_loading: user_id.is_some(),
            error: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self.recompute();
        self
    }

    pub fn with_filters(mut self, filters: TransactionFilters) -> Self {
        self.filters = filters;
        self.recompute();
        self
    }

    pub fn refresh(&mut self) {
        let Some(user_id) = self.user_id.as_deref() else {
            self.is_loading = false;
            return;
        };
        self.is_loading = true;
        self.error = None;
        match self
            .store
            .transactions(user_id, &TxQuery::all().newest_first())
        {
            Ok(rows) => self.all = rows,
            Err(e) => {
                tracing::error!(user_id, "failed to load transactions: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.is_loading = false;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = apply_filters(&self.all, &self.filters, (self.clock)());
    }

    pub fn set_type(&mut self, tx_type: Option<TxType>) {
        self.filters.tx_type = tx_type;
        self.recompute();
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.filters.category = category.map(str::to_string);
        self.recompute();
    }

    pub fn set_status(&mut self, status: Option<TxStatus>) {
        self.filters.status = status;
        self.recompute();
    }

    pub fn set_search(&mut self, search: &str) {
        self.filters.search = search.to_string();
        self.recompute();
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.filters.range = range;
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.filters.sort = sort;
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.filters = TransactionFilters::default();
        self.recompute();
    }

    pub fn filters(&self) -> &TransactionFilters {
        &self.filters
    }

    /// Filtered and sorted transactions.
    pub fn transactions(&self) -> &[Transaction] {
        &self.visible
    }

    pub fn all_transactions(&self) -> &[Transaction] {
        &self.all
    }

    pub fn recent(&self, n: usize) -> Vec<Transaction> {
        most_recent(&self.all, n)
    }

    pub fn total_count(&self) -> usize {
        self.all.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.visible.len()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
