// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod goals;
pub mod metrics;
pub mod profile;
pub mod progress;

pub use goals::Goals;
pub use metrics::{DailyEntry, DailyMetrics};
pub use profile::Profile;
pub use progress::{DailyProgress, GoalProgress};
