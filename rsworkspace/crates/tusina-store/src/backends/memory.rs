//! In-memory [`RecordStore`] backend backed by `Arc<RwLock<HashMap>>`.
//!
//! Used by tests and by the binary when no Redis URL is configured, in
//! which case it is seeded once at start-up.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::store::RecordStore;
use crate::token::LookupToken;

/// Error type for [`MemoryStore`].
#[derive(Debug, thiserror::Error)]
#[error("memory store lock poisoned")]
pub struct MemoryStoreError;

impl<T> From<PoisonError<T>> for MemoryStoreError {
    fn from(_: PoisonError<T>) -> Self {
        Self
    }
}

/// Thread-safe in-memory record store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `raw` under `token`, replacing any previous value.
    pub fn insert(
        &self,
        token: &LookupToken,
        raw: impl Into<String>,
    ) -> Result<(), MemoryStoreError> {
        self.inner
            .write()?
            .insert(token.as_str().to_string(), raw.into());
        Ok(())
    }

    pub fn remove(&self, token: &LookupToken) -> Result<Option<String>, MemoryStoreError> {
        Ok(self.inner.write()?.remove(token.as_str()))
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn get(&self, token: &LookupToken) -> Result<Option<String>, Self::Error> {
        Ok(self.inner.read()?.get(token.as_str()).cloned())
    }
}
