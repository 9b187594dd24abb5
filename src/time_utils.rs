// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Utc};
use std::time::Duration;

/// Storage format for calendar dates (`yyyy-MM-dd`).
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// The current calendar date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as a storage/document key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `yyyy-MM-dd` key back into a date.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Human-readable date for history listings, e.g. `Jan 05, 2024`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Time left until the next local midnight after `now`.
///
/// Falls back to 24 hours if the next midnight does not exist in the local
/// zone (DST transitions at 00:00).
pub fn duration_until_next_midnight<Tz: TimeZone>(now: DateTime<Tz>) -> Duration {
    let fallback = Duration::from_secs(24 * 60 * 60);

    let Some(tomorrow) = now.date_naive().checked_add_days(Days::new(1)) else {
        return fallback;
    };
    let Some(midnight) = tomorrow
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| now.timezone().from_local_datetime(&naive).earliest())
    else {
        return fallback;
    };

    (midnight - now).to_std().unwrap_or(fallback)
}

/// Format an integer with `,` thousands separators.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
