// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// An inclusive `[start, end]` range over which transactions are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Window { start, end }
    }

    /// First instant of `now`'s calendar month through `now`.
    pub fn current_month(now: NaiveDateTime) -> Self {
        Window {
            start: month_start(now.date()),
            end: now,
        }
    }

    /// The whole calendar month, first instant to last millisecond.
    pub fn for_month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Window {
            start: first.and_hms_opt(0, 0, 0)?,
            end: next.and_hms_opt(0, 0, 0)? - Duration::milliseconds(1),
        })
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// The window of identical duration ending one millisecond before `start`.
    ///
    /// Saturates at [`NaiveDateTime::MIN`] near the start of the calendar.
    pub fn previous(&self) -> Self {
        let end = self
            .start
            .checked_sub_signed(Duration::milliseconds(1))
            .unwrap_or(NaiveDateTime::MIN);
        Window {
            start: end
                .checked_sub_signed(self.length())
                .unwrap_or(NaiveDateTime::MIN),
            end,
        }
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.start && ts <= self.end
    }
}

pub fn month_start(d: NaiveDate) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(d.year(), d.month(), 1)
        .unwrap_or(d)
        .and_time(chrono::NaiveTime::MIN)
}
