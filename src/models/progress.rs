// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Progress of today's metrics toward the user's goals.
//!
//! Goals below 1 are treated as 1 so a zeroed goal never divides by zero,
//! and percentages are capped to the 0-100 range shown on the dashboard.

use crate::models::{DailyMetrics, Goals};
use crate::time_utils::format_thousands;
use serde::Serialize;

/// Progress toward a single goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub current: u32,
    pub goal: u32,
    pub percent: u8,
    /// e.g. `"1,234/10,000 steps"`
    pub label: String,
}

impl GoalProgress {
    pub fn new(current: u32, goal: u32, unit: &str) -> Self {
        let goal = goal.max(1);
        let percent = (u64::from(current) * 100 / u64::from(goal)).min(100) as u8;

        Self {
            current,
            goal,
            percent,
            label: format!(
                "{}/{} {}",
                format_thousands(u64::from(current)),
                format_thousands(u64::from(goal)),
                unit
            ),
        }
    }
}

/// Dashboard summary for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyProgress {
    pub steps: GoalProgress,
    pub calories: GoalProgress,
    pub active_time: GoalProgress,
}

impl DailyProgress {
    /// Missing metrics count as zero.
    pub fn from_metrics(metrics: Option<&DailyMetrics>, goals: &Goals) -> Self {
        let (steps, calories, active_time) = metrics
            .map(|m| (m.steps, m.calories, m.active_time))
            .unwrap_or_default();

        Self {
            steps: GoalProgress::new(steps, goals.steps, "steps"),
            calories: GoalProgress::new(calories, goals.calories, "calories"),
            active_time: GoalProgress::new(active_time, goals.active_time, "minutes"),
        }
    }
}
