//! Access to the signed-in user's ID token.

use std::sync::{Arc, RwLock};

/// Supplies the current user's ID token to outgoing requests.
pub trait CurrentUser: Send + Sync {
    fn id_token(&self) -> Option<String>;
}

/// Shared, swappable ID token.
///
/// Clones share the same slot, so an account flow can store a fresh token
/// that the backend picks up on its next request.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(Arc<RwLock<Option<String>>>);

impl SessionToken {
    pub fn new(token: Option<String>) -> Self {
        SessionToken(Arc::new(RwLock::new(token)))
    }

    pub fn set(&self, token: impl Into<String>) {
        let mut slot = self.0.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.into());
    }

    pub fn clear(&self) {
        let mut slot = self.0.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

impl CurrentUser for SessionToken {
    fn id_token(&self) -> Option<String> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
