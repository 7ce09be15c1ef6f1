use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Collection, RecordStore};
use crate::error::BillingError;

/// In-process record store backed by a plain map.
///
/// Used as the injected fake in tests and as the volatile backend when
/// no durable storage is wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<Collection, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read(&self, collection: Collection) -> Result<Option<String>, BillingError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| BillingError::Storage("memory store lock poisoned".to_string()))?;
        Ok(blobs.get(&collection).cloned())
    }

    async fn write(&self, collection: Collection, payload: &str) -> Result<(), BillingError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| BillingError::Storage("memory store lock poisoned".to_string()))?;
        blobs.insert(collection, payload.to_string());
        Ok(())
    }
}
