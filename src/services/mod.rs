// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod identity;
pub mod rollover;
pub mod session;
pub mod sync;

pub use identity::{IdentityProvider, SessionIdentity};
pub use session::{SessionService, SignInReport};
pub use sync::{SyncOutcome, SyncService};
