// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cards;
pub mod doctor;
pub mod importer;
pub mod reports;
pub mod settings;
pub mod transactions;

use anyhow::{Context, Result, anyhow};
use chrono::{Duration, NaiveTime};
use rusqlite::Connection;

use crate::config::Config;
use crate::utils::parse_date;
use crate::window::Window;

/// User id for a subcommand that takes `--user`.
pub fn user_for(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<String> {
    cfg.resolve_user(conn, sub.get_one::<String>("user").map(String::as_str))
}

/// `--from`/`--to` as a window covering both days completely.
pub fn window_arg(sub: &clap::ArgMatches) -> Result<Option<Window>> {
    let (Some(from), Some(to)) = (sub.get_one::<String>("from"), sub.get_one::<String>("to"))
    else {
        return Ok(None);
    };
    let start = parse_date(from).context("--from")?.date().and_time(NaiveTime::MIN);
    let end = parse_date(to)
        .context("--to")?
        .date()
        .and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::days(1))
        .and_then(|d| d.checked_sub_signed(Duration::milliseconds(1)))
        .ok_or_else(|| anyhow!("--to {} is out of range", to.trim()))?;
    if end < start {
        return Err(anyhow!("--to {} is before --from {}", to.trim(), from.trim()));
    }
    Ok(Some(Window::new(start, end)))
}
