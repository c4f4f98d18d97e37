// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::user_for;
use crate::config::Config;
use crate::models::{TxStatus, TxType};
use crate::store::{NewTransaction, SqliteStore, TransactionStore};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, cfg, sub),
        _ => Ok(()),
    }
}

fn optional(rec: &csv::StringRecord, idx: usize) -> Option<String> {
    rec.get(idx)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Import `date,type,amount,category,description,status,reference,payment_method`
/// rows. Either every row is stored or none is.
fn import_transactions(conn: &mut Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_for(conn, cfg, sub)?;
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    {
        let store = SqliteStore::new(&tx);
        for (line, result) in rdr.records().enumerate() {
            let rec = result?;
            // header is line 1
            let row = line + 2;
            let date_raw = rec.get(0).context("date missing")?.trim().to_string();
            let type_raw = rec.get(1).context("type missing")?.trim().to_string();
            let amount_raw = rec.get(2).context("amount missing")?.trim().to_string();

            let date = parse_date(&date_raw)
                .with_context(|| format!("Row {}: invalid transaction date '{}'", row, date_raw))?;
            let tx_type: TxType = type_raw
                .parse()
                .with_context(|| format!("Row {}: invalid type", row))?;
            let amount = parse_decimal(&amount_raw)
                .with_context(|| format!("Row {}: invalid amount '{}'", row, amount_raw))?;
            if amount.is_sign_negative() {
                return Err(anyhow!("Row {}: amount {} is negative", row, amount));
            }
            let status = match optional(&rec, 5) {
                Some(s) => s
                    .parse::<TxStatus>()
                    .with_context(|| format!("Row {}: invalid status", row))?,
                None => TxStatus::Completed,
            };

            store.insert_transaction(
                &user,
                &NewTransaction {
                    tx_type,
                    amount,
                    category: optional(&rec, 3),
                    description: optional(&rec, 4).unwrap_or_default(),
                    date: Some(date),
                    status,
                    reference: optional(&rec, 6),
                    payment_method: optional(&rec, 7),
                },
            )?;
            count += 1;
        }
    }
    tx.commit()?;
    tracing::info!(user = %user, count, path, "import finished");
    println!("Imported {} transactions for {} from {}", count, user, path);
    Ok(())
}
