//! Record store abstraction.
//!
//! Collections are persisted as whole text blobs (JSON arrays) in a
//! local key-value namespace. Two implementations exist:
//!
//! - [`MemoryStore`]: in-process map, the fake used by tests.
//! - [`JsonFileStore`]: one `<collection>.json` file per collection
//!   under a data directory, for durable local storage.
//!
//! There are no indices and no partial writes: every entity operation
//! reads a full collection, mutates it in memory, and writes it back.

pub mod json_file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::BillingError;

/// The five persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Clients,
    Matters,
    Timekeepers,
    TimeEntries,
    MatterRates,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Self::Clients,
        Self::Matters,
        Self::Timekeepers,
        Self::TimeEntries,
        Self::MatterRates,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Matters => "matters",
            Self::Timekeepers => "timekeepers",
            Self::TimeEntries => "time_entries",
            Self::MatterRates => "matter_rates",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "clients" => Some(Self::Clients),
            "matters" => Some(Self::Matters),
            "timekeepers" => Some(Self::Timekeepers),
            "time_entries" => Some(Self::TimeEntries),
            "matter_rates" => Some(Self::MatterRates),
            _ => None,
        }
    }
}

/// Backend-agnostic whole-collection store.
///
/// `read` returns `None` for a collection that has never been written;
/// `write` replaces the prior blob entirely.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn read(&self, collection: Collection) -> Result<Option<String>, BillingError>;
    async fn write(&self, collection: Collection, payload: &str) -> Result<(), BillingError>;
}

/// Create a record store backend from configuration.
pub async fn connect_from_config(
    config: &StoreConfig,
) -> Result<Arc<dyn RecordStore>, BillingError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::default())),
        StoreBackend::JsonFile => {
            let store = JsonFileStore::open(&config.data_dir).await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Collection;

    #[test]
    fn collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(
                Collection::from_db_value(collection.as_str()),
                Some(collection)
            );
        }
        assert_eq!(Collection::from_db_value("invoices"), None);
    }
}
