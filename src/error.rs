// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised at the data-access boundary.
//!
//! Every failure coming out of a [`crate::store::TransactionStore`] is one of
//! these variants, so callers match on the kind instead of inspecting the
//! shape of whatever the backend returned.

/// The errors that may occur while reading or writing ledger data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying SQLite call failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An amount could not be parsed or was negative.
    #[error("invalid amount '{0}', expected a non-negative decimal")]
    InvalidAmount(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD or an ISO-8601 timestamp")]
    InvalidDate(String),

    #[error("unknown transaction type '{0}' (use income|expense|transfer)")]
    InvalidType(String),

    #[error("unknown transaction status '{0}' (use completed|pending|failed)")]
    InvalidStatus(String),

    #[error("unknown card kind '{0}' (use debit|credit)")]
    InvalidCardKind(String),

    /// The requested record does not exist or belongs to another user.
    #[error("{0} not found")]
    NotFound(String),

    /// No user identity could be resolved for a user-scoped operation.
    #[error("no user selected; pass --user, set KUDI_USER or run `kudi config set-user`")]
    NoUser,
}

pub type Result<T> = std::result::Result<T, Error>;
