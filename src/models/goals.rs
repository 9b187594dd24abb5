// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Daily targets for the three tracked metrics.

use serde::{Deserialize, Serialize};

pub const DEFAULT_STEPS_GOAL: u32 = 10_000;
pub const DEFAULT_CALORIES_GOAL: u32 = 500;
pub const DEFAULT_ACTIVE_TIME_GOAL: u32 = 30;

/// Singleton goals record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    pub steps: u32,
    pub calories: u32,
    /// Target active minutes
    pub active_time: u32,
}

impl Goals {
    pub fn new(steps: u32, calories: u32, active_time: u32) -> Self {
        Self {
            steps,
            calories,
            active_time,
        }
    }
}

impl Default for Goals {
    fn default() -> Self {
        Self::new(
            DEFAULT_STEPS_GOAL,
            DEFAULT_CALORIES_GOAL,
            DEFAULT_ACTIVE_TIME_GOAL,
        )
    }
}
