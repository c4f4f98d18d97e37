// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::user_for;
use crate::config::Config;
use crate::filters::{DateRange, SortKey, TransactionFilters};
use crate::hooks::{Clock, TransactionsView, local_now};
use crate::models::{Transaction, TxStatus, TxType};
use crate::store::{NewTransaction, SqliteStore, TransactionStore};
use crate::utils::{
    fmt_money, get_display_currency, maybe_print_json, parse_date, parse_decimal, pretty_table,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, cfg, sub)?,
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("recent", sub)) => recent(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt_trimmed(sub: &clap::ArgMatches, id: &str) -> Option<String> {
    sub.get_one::<String>(id)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn add(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_for(conn, cfg, sub)?;
    let tx_type: TxType = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount.is_sign_negative() {
        return Err(anyhow!("Amount must not be negative; use --type expense instead"));
    }
    let date = match sub.get_one::<String>("date") {
        Some(d) => Some(parse_date(d)?),
        None => None,
    };
    let status: TxStatus = sub.get_one::<String>("status").unwrap().parse()?;

    let new_tx = NewTransaction {
        tx_type,
        amount,
        category: opt_trimmed(sub, "category"),
        description: opt_trimmed(sub, "description").unwrap_or_default(),
        date,
        status,
        reference: opt_trimmed(sub, "reference"),
        payment_method: opt_trimmed(sub, "payment-method"),
    };
    let store = SqliteStore::new(conn);
    let id = store.insert_transaction(&user, &new_tx)?;
    println!(
        "Recorded {} {} for {} (id {})",
        tx_type,
        fmt_money(&amount, &get_display_currency(conn)?),
        user,
        id
    );
    Ok(())
}

pub fn filters_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilters> {
    let tx_type = match opt_trimmed(sub, "type") {
        Some(t) if t.eq_ignore_ascii_case("all") => None,
        Some(t) => Some(t.parse::<TxType>()?),
        None => None,
    };
    let status = match opt_trimmed(sub, "status") {
        Some(s) if s.eq_ignore_ascii_case("all") => None,
        Some(s) => Some(s.parse::<TxStatus>()?),
        None => None,
    };
    let category = opt_trimmed(sub, "category").filter(|c| !c.eq_ignore_ascii_case("all"));
    let range = match sub.get_one::<String>("range") {
        Some(r) => r.parse::<DateRange>()?,
        None => DateRange::default(),
    };
    let sort = match sub.get_one::<String>("sort") {
        Some(s) => s.parse::<SortKey>()?,
        None => SortKey::default(),
    };
    Ok(TransactionFilters {
        tx_type,
        category,
        status,
        search: opt_trimmed(sub, "search").unwrap_or_default(),
        range,
        sort,
    })
}

/// Rows `tx list` would print, evaluated at `clock()`.
pub fn query_rows(
    conn: &Connection,
    cfg: &Config,
    sub: &clap::ArgMatches,
    clock: Clock,
) -> Result<Vec<Transaction>> {
    let user = user_for(conn, cfg, sub)?;
    let store = SqliteStore::new(conn);
    let mut view = TransactionsView::new(&store, Some(user.as_str()))
        .with_clock(clock)
        .with_filters(filters_from_args(sub)?);
    view.refresh();
    if let Some(e) = view.error() {
        return Err(anyhow!("Failed to load transactions: {}", e));
    }
    let mut rows = view.transactions().to_vec();
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn print_rows(conn: &Connection, sub: &clap::ArgMatches, data: &[Transaction]) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    let ccy = get_display_currency(conn)?;
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.effective_date()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                t.tx_type.to_string(),
                fmt_money(&t.amount, &ccy),
                t.category_or_default().to_string(),
                t.status.to_string(),
                t.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Type", "Amount", "Category", "Status", "Description"],
            rows,
        )
    );
    Ok(())
}

fn list(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, cfg, sub, local_now)?;
    print_rows(conn, sub, &data)
}

fn recent(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_for(conn, cfg, sub)?;
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&10);
    let store = SqliteStore::new(conn);
    let mut view = TransactionsView::new(&store, Some(user.as_str()));
    view.refresh();
    if let Some(e) = view.error() {
        return Err(anyhow!("Failed to load transactions: {}", e));
    }
    print_rows(conn, sub, &view.recent(limit))
}
