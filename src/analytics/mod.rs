// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregations over a user's transaction list.
//!
//! Each submodule exposes a pure function over in-memory transactions and a
//! `get_*` wrapper that reads what it needs from a
//! [`TransactionStore`](crate::store::TransactionStore). The pure functions
//! never fail: missing dates are skipped and empty input yields zero, empty or
//! `N/A` values.

pub mod categories;
pub mod dashboard;
pub mod ledger;
pub mod overview;
pub mod trend;

pub use categories::{category_color, category_spending, get_category_spending};
pub use dashboard::{Snapshot, dashboard_stats, get_dashboard_stats};
pub use ledger::{get_payment_method_usage, ledger_summary, payment_method_usage, reconcile_balances};
pub use overview::{analytics_overview, get_analytics_overview, health_grade, health_score};
pub use trend::{get_monthly_trend, monthly_trend};
