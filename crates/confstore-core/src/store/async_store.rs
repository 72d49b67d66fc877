//! Tokio adapter for [`ConfigStore`].
//!
//! Every store operation is blocking file I/O followed by an fsync.  Async
//! hosts should not run that on an executor thread, so [`AsyncConfigStore`]
//! hands each call to `tokio::task::spawn_blocking` and awaits the result.
//! The protocol itself is unchanged.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StoreError;
use super::loader::LoadOutcome;
use super::ConfigStore;
use crate::codec::Codec;
use crate::domain::StorageLocation;
use crate::fs::FileOps;

/// Cheaply cloneable handle running a shared [`ConfigStore`] on the blocking
/// pool.
#[derive(Debug)]
pub struct AsyncConfigStore<C, F> {
    inner: Arc<ConfigStore<C, F>>,
}

impl<C, F> Clone for AsyncConfigStore<C, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, F> AsyncConfigStore<C, F>
where
    C: Codec + Send + Sync + 'static,
    F: FileOps + Send + Sync + 'static,
{
    pub fn new(store: ConfigStore<C, F>) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// The wrapped synchronous store.
    pub fn blocking(&self) -> &ConfigStore<C, F> {
        &self.inner
    }

    /// [`ConfigStore::load`] on the blocking pool.
    ///
    /// # Errors
    ///
    /// Only [`StoreError::TaskJoin`]; load problems are reported through the
    /// returned [`LoadOutcome`].
    pub async fn load<T>(&self, location: StorageLocation) -> Result<LoadOutcome<T>, StoreError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let store = Arc::clone(&self.inner);
        let outcome = tokio::task::spawn_blocking(move || store.load(&location)).await?;
        Ok(outcome)
    }

    /// [`ConfigStore::save`] on the blocking pool.
    ///
    /// # Errors
    ///
    /// Anything [`ConfigStore::save`] returns, plus [`StoreError::TaskJoin`].
    pub async fn save<T>(&self, value: T, location: StorageLocation) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let store = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || store.save(&value, &location)).await?
    }
}

impl<C, F> From<ConfigStore<C, F>> for AsyncConfigStore<C, F>
where
    C: Codec + Send + Sync + 'static,
    F: FileOps + Send + Sync + 'static,
{
    fn from(store: ConfigStore<C, F>) -> Self {
        Self::new(store)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
