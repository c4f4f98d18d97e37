// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::env;
use std::path::PathBuf;

use crate::error::Error;
use crate::utils::get_setting;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Kudi", "kudi"));

pub const DB_ENV: &str = "KUDI_DB";
pub const USER_ENV: &str = "KUDI_USER";
pub const LOG_ENV: &str = "KUDI_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub default_user: Option<String>,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            db_path: db_path()?,
            default_user: non_empty_env(USER_ENV),
            log_filter: non_empty_env(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// `--user` flag, then `KUDI_USER`, then the `default_user` setting.
    pub fn resolve_user(&self, conn: &Connection, flag: Option<&str>) -> Result<String> {
        if let Some(u) = flag.map(str::trim).filter(|u| !u.is_empty()) {
            return Ok(u.to_string());
        }
        if let Some(u) = &self.default_user {
            return Ok(u.clone());
        }
        match get_setting(conn, "default_user")? {
            Some(u) if !u.trim().is_empty() => Ok(u.trim().to_string()),
            _ => Err(Error::NoUser.into()),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = non_empty_env(DB_ENV) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().join("kudi.sqlite"))
}
