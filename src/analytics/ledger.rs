// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{
    BalanceReconciliation, Card, LedgerSummary, PaymentMethodUsage, Transaction, TxType,
};
use crate::store::{TransactionStore, TxQuery};
use crate::utils::{percent_change, ratio, relative_change};
use crate::window::{Window, month_start};

const DEFAULT_PAYMENT_METHOD: &str = "Other";

/// Transaction count per payment method, most used first.
pub fn payment_method_usage(transactions: &[Transaction]) -> Vec<PaymentMethodUsage> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for tx in transactions {
        let method = match tx.payment_method.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m,
            _ => DEFAULT_PAYMENT_METHOD,
        };
        *counts.entry(method).or_insert(0) += 1;
    }
    let total = transactions.len();
    let mut usage: Vec<PaymentMethodUsage> = counts
        .into_iter()
        .map(|(method, count)| PaymentMethodUsage {
            method: method.to_string(),
            count,
            percentage: if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage
}

pub fn get_payment_method_usage(
    store: &dyn TransactionStore,
    user_id: &str,
    window: Option<Window>,
) -> Result<Vec<PaymentMethodUsage>> {
    let txs = store.transactions(user_id, &TxQuery::all().within(window))?;
    Ok(payment_method_usage(&txs))
}

#[derive(Debug, Clone, Copy, Default)]
struct Flow {
    income: Decimal,
    outflow: Decimal,
}

impl Flow {
    fn add(&mut self, tx: &Transaction) {
        match tx.tx_type {
            TxType::Income => self.income += tx.amount,
            TxType::Expense | TxType::Transfer => self.outflow += tx.amount,
        }
    }

    fn balance(&self) -> Decimal {
        self.income - self.outflow
    }
}

/// All-time ledger figures plus this month against last calendar month.
///
/// Unlike the windowed aggregators, transfers count as outflow here, so
/// `total_balance` is what the ledger says is left.
pub fn ledger_summary(transactions: &[Transaction], now: NaiveDateTime) -> LedgerSummary {
    let this_month = month_start(now.date());
    let last_month_end = this_month
        .checked_sub_signed(Duration::milliseconds(1))
        .unwrap_or(NaiveDateTime::MIN);
    let last_month_start = month_start(last_month_end.date());

    let mut all = Flow::default();
    let mut current = Flow::default();
    let mut last = Flow::default();
    let mut until_last_month_end = Flow::default();
    for tx in transactions {
        all.add(tx);
        let Some(date) = tx.effective_date() else {
            continue;
        };
        if date >= this_month {
            current.add(tx);
        }
        if date >= last_month_start && date <= last_month_end {
            last.add(tx);
        }
        if date <= last_month_end {
            until_last_month_end.add(tx);
        }
    }

    let total_balance = all.balance();
    let previous_balance = until_last_month_end.balance();
    let balance_change = if !previous_balance.is_zero() {
        relative_change(total_balance, previous_balance, previous_balance.abs()) * 100.0
    } else if total_balance > Decimal::ZERO {
        100.0
    } else {
        0.0
    };

    LedgerSummary {
        total_balance,
        total_income: all.income,
        total_expenses: all.outflow,
        balance_change,
        income_change: percent_change(current.income, last.income).unwrap_or(0.0),
        expense_change: percent_change(current.outflow, last.outflow).unwrap_or(0.0),
        savings_rate: if all.income > Decimal::ZERO {
            ratio(total_balance, all.income) * 100.0
        } else {
            0.0
        },
        transaction_count: transactions.len(),
    }
}

/// Compare the stored card balances with what the ledger adds up to.
pub fn reconcile_balances(transactions: &[Transaction], active_cards: &[Card]) -> BalanceReconciliation {
    let mut flow = Flow::default();
    let mut undated = 0;
    for tx in transactions {
        flow.add(tx);
        if tx.effective_date().is_none() {
            undated += 1;
        }
    }
    let card_balance: Decimal = active_cards.iter().map(|c| c.balance).sum();
    let ledger_balance = flow.balance();
    let reconciliation = BalanceReconciliation {
        card_balance,
        ledger_balance,
        drift: card_balance - ledger_balance,
        undated_transactions: undated,
    };
    if !reconciliation.is_consistent() {
        tracing::warn!(
            card = %card_balance,
            ledger = %ledger_balance,
            "card balances and ledger disagree"
        );
    }
    reconciliation
}
