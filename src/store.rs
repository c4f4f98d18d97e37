// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Data access for transactions and cards.
//!
//! Aggregators never talk to SQLite directly; they receive a
//! [`TransactionStore`] and a user id, so the same code runs against the
//! database, the [`crate::cache::CachedStore`] wrapper, or a test double.

use std::cmp::Ordering;

use chrono::{Local, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{Card, CardKind, Transaction, TxStatus, TxType};
use crate::utils::format_timestamp;
use crate::window::Window;

/// Ordering of a transaction listing by effective date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// Filter for a user-scoped transaction read.
///
/// With a window, only transactions whose effective date falls inside it are
/// returned; transactions without a usable date can only appear in
/// unwindowed reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TxQuery {
    pub window: Option<Window>,
    pub tx_type: Option<TxType>,
    pub order: Order,
}

impl TxQuery {
    pub fn all() -> Self {
        TxQuery::default()
    }

    pub fn in_window(window: Window) -> Self {
        TxQuery {
            window: Some(window),
            ..TxQuery::default()
        }
    }

    pub fn within(mut self, window: Option<Window>) -> Self {
        self.window = window;
        self
    }

    pub fn of_type(mut self, tx_type: TxType) -> Self {
        self.tx_type = Some(tx_type);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = Order::NewestFirst;
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(t) = self.tx_type {
            if tx.tx_type != t {
                return false;
            }
        }
        match self.window {
            Some(w) => tx.effective_date().is_some_and(|d| w.contains(d)),
            None => true,
        }
    }
}

/// Sort by effective date; undated transactions go last, ties keep id order.
pub fn sort_transactions(txs: &mut [Transaction], order: Order) {
    txs.sort_by(|a, b| {
        let ord = match (a.effective_date(), b.effective_date()) {
            (Some(x), Some(y)) => match order {
                Order::OldestFirst => x.cmp(&y),
                Order::NewestFirst => y.cmp(&x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        ord.then(a.id.cmp(&b.id))
    });
}

/// A transaction to be recorded.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub tx_type: TxType,
    pub amount: Decimal,
    pub category: Option<String>,
    pub description: String,
    /// Economic date; defaults to now.
    pub date: Option<NaiveDateTime>,
    pub status: TxStatus,
    pub reference: Option<String>,
    pub payment_method: Option<String>,
}

impl NewTransaction {
    pub fn new(tx_type: TxType, amount: Decimal) -> Self {
        NewTransaction {
            tx_type,
            amount,
            category: None,
            description: String::new(),
            date: None,
            status: TxStatus::Completed,
            reference: None,
            payment_method: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub kind: CardKind,
    pub last4: String,
    pub bank: String,
    pub balance: Decimal,
}

pub trait TransactionStore {
    /// Transactions owned by `user_id` that match `query`.
    fn transactions(&self, user_id: &str, query: &TxQuery) -> Result<Vec<Transaction>>;

    fn active_cards(&self, user_id: &str) -> Result<Vec<Card>>;

    /// Every card of the user, active or not.
    fn cards(&self, user_id: &str) -> Result<Vec<Card>>;

    fn insert_transaction(&self, user_id: &str, tx: &NewTransaction) -> Result<i64>;

    fn insert_card(&self, user_id: &str, card: &NewCard) -> Result<i64>;

    fn deactivate_card(&self, user_id: &str, card_id: i64) -> Result<()>;
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteStore { conn }
    }

    fn load_cards(&self, user_id: &str, only_active: bool) -> Result<Vec<Card>> {
        let sql = if only_active {
            "SELECT id, user_id, type, last4, bank, balance, is_active FROM cards
             WHERE user_id=?1 AND is_active=1 ORDER BY id"
        } else {
            "SELECT id, user_id, type, last4, bank, balance, is_active FROM cards
             WHERE user_id=?1 ORDER BY id"
        };
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params![user_id])?;
        let mut cards = Vec::new();
        while let Some(r) = rows.next()? {
            if let Some(card) = card_from_row(r)? {
                cards.push(card);
            }
        }
        tracing::debug!(user_id, count = cards.len(), only_active, "loaded cards");
        Ok(cards)
    }
}

impl TransactionStore for SqliteStore<'_> {
    fn transactions(&self, user_id: &str, query: &TxQuery) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, user_id, type, amount, category, description, date, created_at, status, reference, payment_method
             FROM transactions WHERE user_id=?1",
        );
        let mut params_vec: Vec<String> = vec![user_id.to_string()];
        if let Some(t) = query.tx_type {
            sql.push_str(" AND lower(type)=?2");
            params_vec.push(t.as_str().to_string());
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
        let mut data = Vec::new();
        while let Some(r) = rows.next()? {
            if let Some(tx) = transaction_from_row(r)? {
                if query.matches(&tx) {
                    data.push(tx);
                }
            }
        }
        sort_transactions(&mut data, query.order);
        tracing::debug!(user_id, count = data.len(), ?query, "loaded transactions");
        Ok(data)
    }

    fn active_cards(&self, user_id: &str) -> Result<Vec<Card>> {
        self.load_cards(user_id, true)
    }

    fn cards(&self, user_id: &str) -> Result<Vec<Card>> {
        self.load_cards(user_id, false)
    }

    fn insert_transaction(&self, user_id: &str, tx: &NewTransaction) -> Result<i64> {
        if tx.amount.is_sign_negative() {
            return Err(Error::InvalidAmount(tx.amount.to_string()));
        }
        let date = tx.date.unwrap_or_else(|| Local::now().naive_local());
        let category = tx
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        self.conn.execute(
            "INSERT INTO transactions(user_id, type, amount, category, description, date, status, reference, payment_method)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user_id,
                tx.tx_type.as_str(),
                tx.amount.to_string(),
                category,
                tx.description,
                format_timestamp(&date),
                tx.status.as_str(),
                tx.reference,
                tx.payment_method
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(user_id, id, tx_type = %tx.tx_type, amount = %tx.amount, "recorded transaction");
        Ok(id)
    }

    fn insert_card(&self, user_id: &str, card: &NewCard) -> Result<i64> {
        if card.balance.is_sign_negative() {
            return Err(Error::InvalidAmount(card.balance.to_string()));
        }
        self.conn.execute(
            "INSERT INTO cards(user_id, type, last4, bank, balance) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                card.kind.as_str(),
                card.last4,
                card.bank,
                card.balance.to_string()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(user_id, id, bank = %card.bank, "added card");
        Ok(id)
    }

    fn deactivate_card(&self, user_id: &str, card_id: i64) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE cards SET is_active=0 WHERE id=?1 AND user_id=?2",
            params![card_id, user_id],
        )?;
        if n == 0 {
            return Err(Error::NotFound(format!("card {}", card_id)));
        }
        tracing::info!(user_id, card_id, "deactivated card");
        Ok(())
    }
}

fn decimal_from_value(v: Value) -> Option<Decimal> {
    match v {
        Value::Text(s) => s.trim().parse::<Decimal>().ok(),
        Value::Integer(i) => Some(Decimal::from(i)),
        Value::Real(f) => Decimal::try_from(f).ok(),
        _ => None,
    }
}

fn text_from_value(v: Value) -> Option<String> {
    match v {
        Value::Text(s) => Some(s),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        _ => None,
    }
}

/// Malformed rows come back as `Ok(None)` after a warning.
fn transaction_from_row(r: &Row<'_>) -> Result<Option<Transaction>> {
    let id: i64 = r.get(0)?;
    let type_raw: String = r.get(2)?;
    let tx_type = match type_raw.parse::<TxType>() {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(id, "skipping transaction: {}", e);
            return Ok(None);
        }
    };
    let Some(amount) = decimal_from_value(r.get(3)?) else {
        tracing::warn!(id, "skipping transaction with unreadable amount");
        return Ok(None);
    };
    let status_raw: String = r.get(8)?;
    let status = match status_raw.parse::<TxStatus>() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(id, "skipping transaction: {}", e);
            return Ok(None);
        }
    };
    let description: Option<String> = r.get(5)?;
    Ok(Some(Transaction {
        id,
        user_id: r.get(1)?,
        tx_type,
        amount,
        category: r.get(4)?,
        description: description.unwrap_or_default(),
        date: text_from_value(r.get(6)?),
        created_at: text_from_value(r.get(7)?),
        status,
        reference: r.get(9)?,
        payment_method: r.get(10)?,
    }))
}

fn card_from_row(r: &Row<'_>) -> Result<Option<Card>> {
    let id: i64 = r.get(0)?;
    let kind_raw: String = r.get(2)?;
    let kind = match kind_raw.parse::<CardKind>() {
        Ok(k) => k,
        Err(e) => {
            tracing::warn!(id, "skipping card: {}", e);
            return Ok(None);
        }
    };
    let Some(balance) = decimal_from_value(r.get(5)?) else {
        tracing::warn!(id, "skipping card with unreadable balance");
        return Ok(None);
    };
    let is_active: i64 = r.get(6)?;
    Ok(Some(Card {
        id,
        user_id: r.get(1)?,
        kind,
        last4: r.get(3)?,
        bank: r.get(4)?,
        balance,
        is_active: is_active != 0,
    }))
}
