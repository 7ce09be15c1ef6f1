use std::collections::BTreeSet;

use chrono::Utc;

use super::{BillingEngine, next_id};
use crate::error::{BillingError, Entity};
use crate::model::{CreateMatterParams, Matter, MatterStatus, UpdateMatterParams};
use crate::store::Collection;

impl BillingEngine {
    /// Create a matter under an existing client. Fails with
    /// [`BillingError::ClientNotFound`] when the client id does not
    /// resolve. The matter number is the count of the client's matters
    /// at creation time, zero-padded to four digits (count-based, same
    /// repeat-after-delete caveat as client numbers), and the client's
    /// name is copied in as a point-in-time snapshot.
    pub async fn create_matter(&self, input: &CreateMatterParams) -> Result<Matter, BillingError> {
        let client = self
            .get_client(input.client_id)
            .await?
            .ok_or(BillingError::ClientNotFound {
                client_id: input.client_id,
            })?;

        let _guard = self.locks.get(Collection::Matters).lock().await;
        let mut matters: Vec<Matter> = self.read_collection(Collection::Matters).await?;

        let sibling_count = matters
            .iter()
            .filter(|m| m.client_id == input.client_id)
            .count();

        let matter = Matter {
            id: next_id(&matters),
            client_id: input.client_id,
            client_name: client.name,
            matter_number: format!("{:04}", sibling_count),
            matter_name: input.matter_name.clone(),
            description: input.description.clone(),
            status: input.status.unwrap_or(MatterStatus::Active),
            created_at: Utc::now(),
        };

        matters.push(matter.clone());
        self.write_collection(Collection::Matters, &matters).await?;
        tracing::debug!(
            matter_id = matter.id,
            client_id = matter.client_id,
            matter_number = %matter.matter_number,
            "created matter"
        );
        Ok(matter)
    }

    /// All matters, newest first.
    pub async fn get_matters(&self) -> Result<Vec<Matter>, BillingError> {
        let mut matters: Vec<Matter> = self.read_collection(Collection::Matters).await?;
        matters.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matters)
    }

    pub async fn get_matter(&self, id: i64) -> Result<Option<Matter>, BillingError> {
        let matters: Vec<Matter> = self.read_collection(Collection::Matters).await?;
        Ok(matters.into_iter().find(|m| m.id == id))
    }

    /// Merge partial fields into an existing matter. The id, matter
    /// number, and creation timestamp are immutable.
    pub async fn update_matter(
        &self,
        id: i64,
        input: &UpdateMatterParams,
    ) -> Result<Matter, BillingError> {
        let _guard = self.locks.get(Collection::Matters).lock().await;
        let mut matters: Vec<Matter> = self.read_collection(Collection::Matters).await?;

        let matter = matters
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(BillingError::NotFound {
                entity: Entity::Matter,
                id,
            })?;

        if let Some(client_id) = input.client_id {
            matter.client_id = client_id;
        }
        if let Some(client_name) = &input.client_name {
            matter.client_name = client_name.clone();
        }
        if let Some(matter_name) = &input.matter_name {
            matter.matter_name = matter_name.clone();
        }
        if let Some(description) = &input.description {
            matter.description = description.clone();
        }
        if let Some(status) = input.status {
            matter.status = status;
        }

        let updated = matter.clone();
        self.write_collection(Collection::Matters, &matters).await?;
        tracing::debug!(matter_id = id, "updated matter");
        Ok(updated)
    }

    /// Distinct client names across all matters, sorted. Reads the
    /// denormalized snapshots, so a renamed client still shows under
    /// the name it had when each matter was opened. Retained from the
    /// earlier schema that had no client table.
    pub async fn get_unique_client_names(&self) -> Result<Vec<String>, BillingError> {
        let matters: Vec<Matter> = self.read_collection(Collection::Matters).await?;
        let names: BTreeSet<String> = matters.into_iter().map(|m| m.client_name).collect();
        Ok(names.into_iter().collect())
    }
}
