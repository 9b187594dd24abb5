// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Source of the current user identifier.

use std::sync::RwLock;

/// Supplies the signed-in user's id, or `None` when nobody is signed in.
pub trait IdentityProvider: Send + Sync {
    fn current_uid(&self) -> Option<String>;
}

/// Identity held for the lifetime of a session.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    uid: RwLock<Option<String>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(uid: impl Into<String>) -> Self {
        Self {
            uid: RwLock::new(Some(uid.into())),
        }
    }

    pub fn sign_in(&self, uid: impl Into<String>) {
        let mut current = self.uid.write().unwrap_or_else(|p| p.into_inner());
        *current = Some(uid.into());
    }

    pub fn sign_out(&self) {
        let mut current = self.uid.write().unwrap_or_else(|p| p.into_inner());
        *current = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_uid(&self) -> Option<String> {
        self.uid
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}
