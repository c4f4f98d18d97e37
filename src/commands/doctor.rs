// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::Snapshot;
use crate::commands::user_for;
use crate::config::Config;
use crate::hooks::local_now;
use crate::store::SqliteStore;
use crate::utils::{fmt_money, get_display_currency, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

/// Issues found for a user, as `(issue, detail)` pairs.
pub fn check(conn: &Connection, user: &str) -> Result<Vec<(String, String)>> {
    let store = SqliteStore::new(conn);
    let snapshot = Snapshot::load(&store, user, local_now())?;
    let ccy = get_display_currency(conn)?;
    let mut rows = Vec::new();

    // 1) Card balances vs. ledger
    let rec = snapshot.reconciliation();
    if !rec.is_consistent() {
        rows.push((
            "balance_drift".to_string(),
            format!(
                "cards {} vs ledger {} (drift {})",
                fmt_money(&rec.card_balance, &ccy),
                fmt_money(&rec.ledger_balance, &ccy),
                fmt_money(&rec.drift, &ccy)
            ),
        ));
    }

    // 2) Transactions no aggregator can place in time
    if rec.undated_transactions > 0 {
        rows.push((
            "undated_transactions".to_string(),
            format!("{} without a usable date or created_at", rec.undated_transactions),
        ));
    }

    // 3) Rows the store had to skip
    let mut stmt = conn.prepare(
        "SELECT COUNT(*) FROM transactions WHERE user_id=?1
         AND (lower(type) NOT IN ('income','expense','transfer')
              OR lower(status) NOT IN ('completed','pending','failed'))",
    )?;
    let malformed: i64 = stmt.query_row([user], |r| r.get(0))?;
    if malformed > 0 {
        rows.push((
            "malformed_transactions".to_string(),
            format!("{} with an unknown type or status", malformed),
        ));
    }
    Ok(rows)
}

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let user = user_for(conn, cfg, m)?;
    let rows = check(conn, &user)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = rows.into_iter().map(|(a, b)| vec![a, b]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
