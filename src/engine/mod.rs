//! Billing engine: entity operations built atop the record store.
//!
//! Every mutation is a whole-collection read-modify-write guarded by
//! that collection's lock, which preserves the single-writer semantics
//! of the original local store when the engine is shared across tasks.
//! Reads take no lock; they see whichever snapshot was last persisted.

mod clients;
mod matters;
mod rates;
mod summary;
mod time_entries;
mod timekeepers;

pub use clients::ClientSort;

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::error::BillingError;
use crate::model::Keyed;
use crate::store::{Collection, RecordStore, connect_from_config};

/// One guard per collection. Only `delete_client` ever holds two at
/// once, always clients before matters, so lock order is fixed.
#[derive(Debug, Default)]
struct CollectionLocks {
    clients: Mutex<()>,
    matters: Mutex<()>,
    timekeepers: Mutex<()>,
    time_entries: Mutex<()>,
    matter_rates: Mutex<()>,
}

impl CollectionLocks {
    fn get(&self, collection: Collection) -> &Mutex<()> {
        match collection {
            Collection::Clients => &self.clients,
            Collection::Matters => &self.matters,
            Collection::Timekeepers => &self.timekeepers,
            Collection::TimeEntries => &self.time_entries,
            Collection::MatterRates => &self.matter_rates,
        }
    }
}

/// Entity operations over the record store.
pub struct BillingEngine {
    store: Arc<dyn RecordStore>,
    locks: CollectionLocks,
}

impl BillingEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            locks: CollectionLocks::default(),
        }
    }

    /// Build an engine on the backend named by `config`.
    pub async fn from_config(config: &StoreConfig) -> Result<Self, BillingError> {
        let store = connect_from_config(config).await?;
        Ok(Self::new(store))
    }

    pub(crate) async fn read_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, BillingError> {
        match self.store.read(collection).await? {
            Some(blob) => serde_json::from_str(&blob).map_err(|e| {
                BillingError::Serialization(format!(
                    "collection '{}' is corrupt: {}",
                    collection.as_str(),
                    e
                ))
            }),
            None => Ok(Vec::new()),
        }
    }

    pub(crate) async fn write_collection<T: Serialize>(
        &self,
        collection: Collection,
        rows: &[T],
    ) -> Result<(), BillingError> {
        let blob = serde_json::to_string(rows).map_err(|e| {
            BillingError::Serialization(format!(
                "collection '{}' failed to encode: {}",
                collection.as_str(),
                e
            ))
        })?;
        self.store.write(collection, &blob).await
    }
}

/// Next id for a collection snapshot: max existing id + 1, or 1 when
/// empty. Max-based, unlike the count-based display numbers, so ids
/// are never reused after deletes.
pub(crate) fn next_id<T: Keyed>(rows: &[T]) -> i64 {
    rows.iter().map(Keyed::id).max().map_or(1, |max| max + 1)
}

/// Case-aware name ordering: case-insensitive primary comparison with
/// the raw name as tiebreak, so "alpha" and "Alpha" sort adjacently
/// and deterministically.
pub(crate) fn case_aware_name_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::model::{Client, Keyed};

    use super::{case_aware_name_cmp, next_id};

    fn client_with_id(id: i64) -> Client {
        Client {
            id,
            client_number: "000000".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            address: String::new(),
            contact_name: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn next_id_is_one_for_empty_collection() {
        assert_eq!(next_id::<Client>(&[]), 1);
    }

    #[test]
    fn next_id_is_max_plus_one_not_count_plus_one() {
        let rows = vec![client_with_id(3), client_with_id(9)];
        assert_eq!(next_id(&rows), 10);
        assert_eq!(rows[1].id(), 9);
    }

    #[test]
    fn name_ordering_ignores_case_before_raw_tiebreak() {
        assert_eq!(case_aware_name_cmp("alpha", "Beta"), Ordering::Less);
        assert_eq!(case_aware_name_cmp("Alpha", "alpha"), Ordering::Less);
        assert_eq!(case_aware_name_cmp("gamma", "gamma"), Ordering::Equal);
    }
}
