// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Short-lived read cache in front of a [`TransactionStore`].
//!
//! Reads are memoized per `(user_id, query)`; any write for a user drops every
//! cached entry of that user, so aggregators sharing one `CachedStore` see the
//! same rows until the next write. At most `capacity` transaction reads are
//! kept; the oldest is dropped first.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::Result;
use crate::models::{Card, Transaction};
use crate::store::{NewCard, NewTransaction, TransactionStore, TxQuery};

pub const DEFAULT_CAPACITY: usize = 64;

type QueryKey = (String, TxQuery);

#[derive(Default)]
struct Entries {
    transactions: HashMap<QueryKey, Vec<Transaction>>,
    // insertion order of `transactions` keys
    order: VecDeque<QueryKey>,
    active_cards: HashMap<String, Vec<Card>>,
}

pub struct CachedStore<S> {
    inner: S,
    capacity: usize,
    entries: Mutex<Entries>,
}

impl<S: TransactionStore> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        CachedStore {
            inner,
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached read of `user_id`.
    pub fn invalidate(&self, user_id: &str) {
        let mut entries = self.lock();
        entries.transactions.retain(|(u, _), _| u != user_id);
        entries.order.retain(|(u, _)| u != user_id);
        entries.active_cards.remove(user_id);
        tracing::debug!(user_id, "cache invalidated");
    }

    pub fn clear(&self) {
        *self.lock() = Entries::default();
    }

    pub fn cached_queries(&self) -> usize {
        self.lock().transactions.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        // a panic while holding the lock leaves only memoized reads behind
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S: TransactionStore> TransactionStore for CachedStore<S> {
    fn transactions(&self, user_id: &str, query: &TxQuery) -> Result<Vec<Transaction>> {
        let key = (user_id.to_string(), *query);
        if let Some(hit) = self.lock().transactions.get(&key) {
            return Ok(hit.clone());
        }
        let rows = self.inner.transactions(user_id, query)?;
        let mut entries = self.lock();
        while entries.transactions.len() >= self.capacity {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            entries.transactions.remove(&oldest);
        }
        if entries.transactions.insert(key.clone(), rows.clone()).is_none() {
            entries.order.push_back(key);
        }
        Ok(rows)
    }

    fn active_cards(&self, user_id: &str) -> Result<Vec<Card>> {
        if let Some(hit) = self.lock().active_cards.get(user_id) {
            return Ok(hit.clone());
        }
        let cards = self.inner.active_cards(user_id)?;
        self.lock()
            .active_cards
            .insert(user_id.to_string(), cards.clone());
        Ok(cards)
    }

    fn cards(&self, user_id: &str) -> Result<Vec<Card>> {
        self.inner.cards(user_id)
    }

    fn insert_transaction(&self, user_id: &str, tx: &NewTransaction) -> Result<i64> {
        let id = self.inner.insert_transaction(user_id, tx)?;
        self.invalidate(user_id);
        Ok(id)
    }

    fn insert_card(&self, user_id: &str, card: &NewCard) -> Result<i64> {
        let id = self.inner.insert_card(user_id, card)?;
        self.invalidate(user_id);
        Ok(id)
    }

    fn deactivate_card(&self, user_id: &str, card_id: i64) -> Result<()> {
        self.inner.deactivate_card(user_id, card_id)?;
        self.invalidate(user_id);
        Ok(())
    }
}
