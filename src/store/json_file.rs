use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Collection, RecordStore};
use crate::error::BillingError;

/// Durable record store keeping one `<collection>.json` file per
/// collection under a data directory.
///
/// Writes go through a temp file followed by a rename, so an
/// interrupted write never leaves a truncated collection behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, BillingError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            BillingError::Storage(format!("failed to create data dir {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn read(&self, collection: Collection) -> Result<Option<String>, BillingError> {
        let path = self.path_for(collection);
        match tokio::fs::read_to_string(&path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BillingError::Storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn write(&self, collection: Collection, payload: &str) -> Result<(), BillingError> {
        let path = self.path_for(collection);
        let tmp = self.dir.join(format!("{}.json.tmp", collection.as_str()));

        tokio::fs::write(&tmp, payload).await.map_err(|e| {
            BillingError::Storage(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            BillingError::Storage(format!(
                "failed to replace {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::trace!(
            collection = collection.as_str(),
            bytes = payload.len(),
            "persisted collection"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Collection, JsonFileStore, RecordStore};

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(tmp.path()).await.expect("open");
        let blob = store.read(Collection::TimeEntries).await.expect("read");
        assert_eq!(blob, None);
    }

    #[tokio::test]
    async fn write_then_read_returns_payload() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(tmp.path()).await.expect("open");

        store
            .write(Collection::Clients, r#"[{"id":1}]"#)
            .await
            .expect("write");
        let blob = store.read(Collection::Clients).await.expect("read");
        assert_eq!(blob.as_deref(), Some(r#"[{"id":1}]"#));

        let on_disk = tmp.path().join("clients.json");
        assert!(on_disk.exists());
        assert!(!tmp.path().join("clients.json.tmp").exists());
    }

    #[tokio::test]
    async fn reopening_the_same_dir_sees_prior_writes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        {
            let store = JsonFileStore::open(tmp.path()).await.expect("open");
            store
                .write(Collection::MatterRates, "[]")
                .await
                .expect("write");
        }
        let reopened = JsonFileStore::open(tmp.path()).await.expect("reopen");
        let blob = reopened.read(Collection::MatterRates).await.expect("read");
        assert_eq!(blob.as_deref(), Some("[]"));
    }
}
