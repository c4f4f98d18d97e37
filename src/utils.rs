// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Storage format for timestamps written by this crate.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stored or user-supplied date/timestamp.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.fff]`, the same with a `T`
/// separator, and RFC 3339 with an offset (converted to UTC wall time).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn parse_date(s: &str) -> Result<NaiveDateTime> {
    parse_timestamp(s)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s.trim()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s.trim()))
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// `num / den` as `f64`. Quotients beyond `Decimal`'s range are computed in
/// floating point instead. `den` must be non-zero.
pub fn ratio(num: Decimal, den: Decimal) -> f64 {
    match num.checked_div(den) {
        Some(q) => to_f64(q),
        None => to_f64(num) / to_f64(den),
    }
}

/// `(current - previous) / base` without overflowing. `base` must be non-zero.
pub fn relative_change(current: Decimal, previous: Decimal, base: Decimal) -> f64 {
    match current.checked_sub(previous) {
        Some(diff) => ratio(diff, base),
        None => (to_f64(current) - to_f64(previous)) / to_f64(base),
    }
}

/// `(current - previous) / previous * 100`, or `None` without a positive baseline.
pub fn percent_change(current: Decimal, previous: Decimal) -> Option<f64> {
    if previous > Decimal::ZERO {
        Some(relative_change(current, previous, previous) * 100.0)
    } else {
        None
    }
}

/// Signed one-decimal percentage, e.g. `+12.5%` or `-3.0%`.
pub fn fmt_signed_percent(v: f64) -> String {
    if v >= 0.0 {
        // normalise -0.0
        format!("+{:.1}%", v.abs())
    } else {
        format!("{:.1}%", v)
    }
}

pub fn fmt_growth(v: Option<f64>) -> String {
    match v {
        Some(g) => fmt_signed_percent(g),
        None => "N/A".to_string(),
    }
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_display_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "display_currency")?.unwrap_or_else(|| "NGN".to_string()))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
