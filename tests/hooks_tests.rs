// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::{Cell, RefCell};

use chrono::NaiveDateTime;
use kudi::error::{Error, Result};
use kudi::filters::{DateRange, SortKey};
use kudi::hooks::{
    AggregateHook, CategorySpendingHook, DashboardStatsHook, LedgerSummaryHook, MonthlyTrendHook,
    PaymentMethods, TransactionsView,
};
use kudi::models::{Card, CardKind, Transaction, TxStatus, TxType};
use kudi::store::{NewCard, NewTransaction, TransactionStore, TxQuery, sort_transactions};
use kudi::utils::format_timestamp;
use kudi::window::Window;
use rust_decimal::Decimal;

/// In-memory store whose reads can be made to fail.
struct MemStore {
    rows: RefCell<Vec<Transaction>>,
    cards: Vec<Card>,
    fail: Cell<bool>,
}

impl MemStore {
    fn check(&self) -> Result<()> {
        if self.fail.get() {
            return Err(Error::NotFound("ledger".into()));
        }
        Ok(())
    }
}

impl TransactionStore for MemStore {
    fn transactions(&self, user_id: &str, query: &TxQuery) -> Result<Vec<Transaction>> {
        self.check()?;
        let mut rows: Vec<Transaction> = self
            .rows
            .borrow()
            .iter()
            .filter(|t| t.user_id == user_id && query.matches(t))
            .cloned()
            .collect();
        sort_transactions(&mut rows, query.order);
        Ok(rows)
    }

    fn active_cards(&self, user_id: &str) -> Result<Vec<Card>> {
        Ok(self
            .cards(user_id)?
            .into_iter()
            .filter(|c| c.is_active)
            .collect())
    }

    fn cards(&self, user_id: &str) -> Result<Vec<Card>> {
        self.check()?;
        Ok(self
            .cards
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    fn insert_transaction(&self, user_id: &str, tx: &NewTransaction) -> Result<i64> {
        self.check()?;
        let mut rows = self.rows.borrow_mut();
        let id = rows.len() as i64 + 1;
        rows.push(Transaction {
            id,
            user_id: user_id.to_string(),
            tx_type: tx.tx_type,
            amount: tx.amount,
            category: tx.category.clone(),
            description: tx.description.clone(),
            date: tx.date.as_ref().map(format_timestamp),
            created_at: None,
            status: tx.status,
            reference: tx.reference.clone(),
            payment_method: tx.payment_method.clone(),
        });
        Ok(id)
    }

    fn insert_card(&self, _user_id: &str, _card: &NewCard) -> Result<i64> {
        Err(Error::NotFound("card storage".into()))
    }

    fn deactivate_card(&self, _user_id: &str, card_id: i64) -> Result<()> {
        Err(Error::NotFound(format!("card {}", card_id)))
    }
}

fn march_15() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-03-15 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

fn tx(id: i64, t: TxType, amount: i64, date: &str, description: &str) -> Transaction {
    let mut tx = Transaction::new("u1", t, Decimal::from(amount), date).with_description(description);
    tx.id = id;
    tx
}

fn store() -> MemStore {
    let mut wrong_user = tx(8, TxType::Expense, 999, "2024-03-11", "Not mine");
    wrong_user.user_id = "u2".into();
    let rows = vec![
        tx(1, TxType::Income, 200000, "2024-03-01", "March salary")
            .with_category("Salary")
            .with_payment_method("transfer"),
        tx(2, TxType::Expense, 15000, "2024-03-05", "Groceries at Shoprite")
            .with_category("Food")
            .with_payment_method("card"),
        tx(3, TxType::Expense, 60000, "2024-03-10", "Flat")
            .with_category("Rent")
            .with_status(TxStatus::Pending),
        tx(4, TxType::Expense, 8000, "2024-02-20", "Dinner").with_category("Food"),
        tx(5, TxType::Income, 150000, "2024-02-01", "Feb salary").with_category("Salary"),
        tx(6, TxType::Expense, 3000, "2023-12-24", "Gift wrap"),
        tx(7, TxType::Transfer, 10000, "2024-03-12", "To savings").with_status(TxStatus::Failed),
        wrong_user,
    ];
    let card = |id: i64, balance: i64, is_active: bool| Card {
        id,
        user_id: "u1".into(),
        kind: CardKind::Debit,
        last4: "0001".into(),
        bank: "Zenith".into(),
        balance: Decimal::from(balance),
        is_active,
    };
    MemStore {
        rows: RefCell::new(rows),
        cards: vec![card(1, 300000, true), card(2, 5000, false)],
        fail: Cell::new(false),
    }
}

fn ids(rows: &[Transaction]) -> Vec<i64> {
    rows.iter().map(|t| t.id).collect()
}

#[test]
fn hook_without_user_does_not_fetch() {
    let store = store();
    store.fail.set(true);
    let mut hook = MonthlyTrendHook::new(&store, None);
    assert!(!hook.state().is_loading);
    let state = hook.refresh();
    assert!(state.data.is_empty());
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
}

#[test]
fn hook_keeps_previous_data_when_a_reload_fails() {
    let store = store();
    let mut hook = DashboardStatsHook::new(&store, Some("u1")).with_clock(march_15);
    assert!(hook.state().is_loading);

    hook.refresh();
    let loaded = hook.data().clone();
    assert_eq!(loaded.total_income, Decimal::from(200000));
    assert_eq!(loaded.total_expenses, Decimal::from(75000));
    assert_eq!(loaded.transaction_count, 4);
    assert_eq!(loaded.active_cards, 1);
    assert_eq!(loaded.total_balance, Decimal::from(300000));
    // the previous window only holds a loss
    assert_eq!(loaded.monthly_growth, None);

    store.fail.set(true);
    let state = hook.refresh();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("ledger not found"));
    assert_eq!(state.data, loaded);

    store.fail.set(false);
    assert_eq!(hook.refresh().error, None);
}

#[test]
fn changing_the_window_reloads() {
    let store = store();
    let mut hook = CategorySpendingHook::new(&store, Some("u1")).with_clock(march_15);
    hook.refresh();
    let march = hook.data();
    assert_eq!(march.len(), 2);
    assert_eq!(march[0].category, "Rent");
    assert_eq!(march[0].trend, "");
    assert_eq!(march[1].category, "Food");
    assert_eq!(march[1].trend, "+87.5%");

    let feb = Window::for_month(2024, 2);
    let state = hook.set_window(feb);
    assert_eq!(state.data.len(), 1);
    assert_eq!(state.data[0].category, "Food");
    assert_eq!(state.data[0].amount, Decimal::from(8000));
    assert_eq!(hook.window(), feb);
}

#[test]
fn ledger_summary_hook_ignores_the_window() {
    let store = store();
    let mut hook = LedgerSummaryHook::new(&store, Some("u1")).with_clock(march_15);
    let all_time = hook.refresh().data.clone();
    assert_eq!(all_time.total_income, Decimal::from(350000));
    assert_eq!(all_time.total_expenses, Decimal::from(96000));
    assert_eq!(all_time.total_balance, Decimal::from(254000));
    assert_eq!(all_time.transaction_count, 7);

    assert_eq!(hook.set_window(Window::for_month(2024, 2)).data, all_time);
}

#[test]
fn payment_method_state_can_be_taken() {
    let store = store();
    let mut hook = AggregateHook::<PaymentMethods>::new(&store, Some("u1"))
        .with_window(Window::for_month(2024, 3));
    hook.refresh();
    let state = hook.into_state();
    let methods: Vec<(&str, usize)> = state
        .data
        .iter()
        .map(|u| (u.method.as_str(), u.count))
        .collect();
    assert_eq!(methods, [("Other", 2), ("card", 1), ("transfer", 1)]);
}

#[test]
fn view_applies_default_thirty_day_range() {
    let store = store();
    let mut view = TransactionsView::new(&store, Some("u1")).with_clock(march_15);
    assert!(view.is_loading());
    view.refresh();
    assert!(!view.is_loading());
    assert_eq!(view.total_count(), 7);
    assert_eq!(view.filtered_count(), 5);
    assert_eq!(ids(view.transactions()), [7, 3, 2, 1, 4]);
}

#[test]
fn view_filters_combine_and_reset() {
    let store = store();
    let mut view = TransactionsView::new(&store, Some("u1")).with_clock(march_15);
    view.refresh();

    view.set_type(Some(TxType::Expense));
    assert_eq!(ids(view.transactions()), [3, 2, 4]);
    view.set_category(Some("food"));
    assert_eq!(ids(view.transactions()), [2, 4]);
    view.set_search("SHOPRITE");
    assert_eq!(ids(view.transactions()), [2]);

    view.reset_filters();
    assert_eq!(view.filters().range, DateRange::ThirtyDays);
    assert_eq!(view.filtered_count(), 5);

    // search also looks at the category
    view.set_search("rent");
    assert_eq!(ids(view.transactions()), [3]);
}

#[test]
fn view_sorts_and_matches_uncategorised_rows() {
    let store = store();
    let mut view = TransactionsView::new(&store, Some("u1")).with_clock(march_15);
    view.refresh();

    view.set_range(DateRange::All);
    view.set_sort(SortKey::Amount);
    assert_eq!(ids(view.transactions()), [1, 5, 3, 2, 7, 4, 6]);

    view.set_sort(SortKey::Type);
    let types: Vec<TxType> = view.transactions().iter().map(|t| t.tx_type).collect();
    assert_eq!(types[..4], [TxType::Expense; 4]);
    assert_eq!(types[6], TxType::Transfer);

    view.set_sort(SortKey::Amount);
    view.set_category(Some("Others"));
    assert_eq!(ids(view.transactions()), [7, 6]);
    view.set_status(Some(TxStatus::Failed));
    assert_eq!(ids(view.transactions()), [7]);
    view.set_category(None);
    view.set_status(Some(TxStatus::Pending));
    assert_eq!(ids(view.transactions()), [3]);
}

#[test]
fn recent_ignores_filters() {
    let store = store();
    let mut view = TransactionsView::new(&store, Some("u1")).with_clock(march_15);
    view.refresh();
    view.set_type(Some(TxType::Income));
    assert_eq!(ids(&view.recent(2)), [7, 3]);
    assert_eq!(view.recent(50).len(), 7);
}

#[test]
fn view_keeps_rows_when_reload_fails() {
    let store = store();
    let mut view = TransactionsView::new(&store, Some("u1")).with_clock(march_15);
    view.refresh();
    assert_eq!(view.error(), None);

    store.fail.set(true);
    view.refresh();
    assert_eq!(view.error(), Some("ledger not found"));
    assert_eq!(view.all_transactions().len(), 7);
    assert_eq!(view.filtered_count(), 5);
}

#[test]
fn view_sees_new_rows_after_refresh() {
    let store = store();
    let mut view = TransactionsView::new(&store, Some("u1")).with_clock(march_15);
    view.refresh();

    let mut new_tx = NewTransaction::new(TxType::Expense, Decimal::from(2500));
    new_tx.date = Some(march_15());
    new_tx.category = Some("Transportation".into());
    store.insert_transaction("u1", &new_tx).unwrap();
    assert_eq!(view.total_count(), 7);

    view.refresh();
    assert_eq!(view.total_count(), 8);
    assert_eq!(view.transactions()[0].category.as_deref(), Some("Transportation"));
}

#[test]
fn view_without_user_is_empty() {
    let store = store();
    let mut view = TransactionsView::new(&store, None);
    assert!(!view.is_loading());
    view.refresh();
    assert_eq!(view.total_count(), 0);
    assert!(view.transactions().is_empty());
}
