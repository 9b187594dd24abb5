// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Daily activity metrics.

use crate::error::AppError;
use crate::validation::clock_parts;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Generic notice for input that slipped past validation but cannot be parsed.
pub const INVALID_NUMBER_FORMAT: &str = "Invalid number format";

/// One calendar day of activity. The date is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub steps: u32,
    pub calories: u32,
    /// Active minutes (at most 1440)
    pub active_time: u32,
}

/// Parsed values of the daily-metrics form, not yet tied to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub steps: u32,
    pub calories: u32,
    pub active_time: u32,
}

impl DailyEntry {
    /// Parse already-validated form strings.
    ///
    /// Active time may be whole minutes or `HH:MM`.
    pub fn parse(steps: &str, calories: &str, active_time: &str) -> Result<Self, AppError> {
        Ok(Self {
            steps: parse_count(steps)?,
            calories: parse_count(calories)?,
            active_time: parse_active_minutes(active_time)
                .ok_or_else(|| AppError::InvalidInput(INVALID_NUMBER_FORMAT.to_string()))?,
        })
    }

    pub fn on(self, date: NaiveDate) -> DailyMetrics {
        DailyMetrics {
            date,
            steps: self.steps,
            calories: self.calories,
            active_time: self.active_time,
        }
    }
}

/// Parse a non-negative whole number, trimming surrounding whitespace.
///
/// Accepts the same signed forms as the validators, so `"-0"` is zero.
pub fn parse_count(raw: &str) -> Result<u32, AppError> {
    non_negative(raw.trim())
        .ok_or_else(|| AppError::InvalidInput(INVALID_NUMBER_FORMAT.to_string()))
}

/// Total minutes for `"90"` or `"1:30"` style input.
pub fn parse_active_minutes(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if !raw.contains(':') {
        return non_negative(raw);
    }

    let parts = clock_parts(raw);
    let [hours, minutes] = parts.as_slice() else {
        return None;
    };
    let hours = non_negative(hours)?;
    let minutes = non_negative(minutes)?;
    if minutes >= 60 {
        return None;
    }
    hours.checked_mul(60)?.checked_add(minutes)
}

fn non_negative(raw: &str) -> Option<u32> {
    raw.parse::<i32>().ok().and_then(|n| u32::try_from(n).ok())
}
