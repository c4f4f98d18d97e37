// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::user_for;
use crate::config::Config;
use crate::models::CardKind;
use crate::store::{NewCard, SqliteStore, TransactionStore};
use crate::utils::{fmt_money, get_display_currency, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let user = user_for(conn, cfg, sub)?;
            let kind: CardKind = sub.get_one::<String>("kind").unwrap().parse()?;
            let last4 = sub.get_one::<String>("last4").unwrap().trim().to_string();
            if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
                return Err(anyhow!("--last4 must be exactly four digits, got '{}'", last4));
            }
            let bank = sub.get_one::<String>("bank").unwrap().trim().to_string();
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let id = store.insert_card(
                &user,
                &NewCard {
                    kind,
                    last4: last4.clone(),
                    bank: bank.clone(),
                    balance,
                },
            )?;
            println!("Added {} card {} ****{} (id {})", kind.as_str(), bank, last4, id);
        }
        Some(("list", sub)) => {
            let user = user_for(conn, cfg, sub)?;
            let cards = if sub.get_flag("all") {
                store.cards(&user)?
            } else {
                store.active_cards(&user)?
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cards)? {
                let ccy = get_display_currency(conn)?;
                let rows = cards
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.kind.as_str().to_string(),
                            c.bank.clone(),
                            format!("****{}", c.last4),
                            fmt_money(&c.balance, &ccy),
                            if c.is_active { "yes" } else { "no" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Type", "Bank", "Number", "Balance", "Active"], rows)
                );
            }
        }
        Some(("deactivate", sub)) => {
            let user = user_for(conn, cfg, sub)?;
            let id = *sub.get_one::<i64>("id").unwrap();
            store.deactivate_card(&user, id)?;
            println!("Deactivated card {}", id);
        }
        _ => {}
    }
    Ok(())
}
