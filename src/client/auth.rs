use std::sync::{Arc, RwLock};

/// Shared handle to the current session token
///
/// Clones share the same slot, so the middleware that reads the token and
/// the code that logs in or out always agree.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        let mut slot = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = (!token.is_empty()).then_some(token);
    }

    pub fn clear(&self) {
        let mut slot = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}
