// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::utils::{get_display_currency, get_setting, pretty_table, set_setting};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let user = cfg
                .resolve_user(conn, None)
                .unwrap_or_else(|_| "(none)".to_string());
            let rows = vec![
                vec!["database".into(), cfg.db_path.display().to_string()],
                vec!["user".into(), user],
                vec!["display_currency".into(), get_display_currency(conn)?],
                vec!["log_filter".into(), cfg.log_filter.clone()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-currency", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().trim().to_uppercase();
            if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(anyhow!("Currency must be a 3-letter code, got '{}'", ccy));
            }
            set_setting(conn, "display_currency", &ccy)?;
            println!("Display currency set to {}", ccy);
        }
        Some(("set-user", sub)) => {
            let user = sub.get_one::<String>("user").unwrap().trim().to_string();
            if user.is_empty() {
                return Err(anyhow!("User id must not be empty"));
            }
            let previous = get_setting(conn, "default_user")?;
            set_setting(conn, "default_user", &user)?;
            match previous {
                Some(p) if p != user => println!("Default user changed: {} -> {}", p, user),
                _ => println!("Default user set to {}", user),
            }
        }
        _ => {}
    }
    Ok(())
}
