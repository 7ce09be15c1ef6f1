use chrono::Utc;

use super::{BillingEngine, next_id};
use crate::error::{BillingError, Entity};
use crate::model::{
    CreateTimeEntryParams, Matter, TimeEntry, TimeEntryView, Timekeeper, UNKNOWN_NAME,
    UpdateTimeEntryParams,
};
use crate::store::Collection;

impl BillingEngine {
    /// Record a time entry. Unlike `create_matter`, this does not
    /// validate that the matter or timekeeper exist: stored data may
    /// already contain orphaned entries (client deletes do not cascade
    /// here), and the read side tolerates broken references.
    pub async fn create_time_entry(
        &self,
        input: &CreateTimeEntryParams,
    ) -> Result<TimeEntry, BillingError> {
        let _guard = self.locks.get(Collection::TimeEntries).lock().await;
        let mut entries: Vec<TimeEntry> = self.read_collection(Collection::TimeEntries).await?;

        let entry = TimeEntry {
            id: next_id(&entries),
            matter_id: input.matter_id,
            timekeeper_id: input.timekeeper_id,
            date: input.date,
            hours: input.hours,
            description: input.description.clone(),
            is_billable: input.is_billable,
            override_rate: input.override_rate,
            created_at: Utc::now(),
        };

        entries.push(entry.clone());
        self.write_collection(Collection::TimeEntries, &entries)
            .await?;
        tracing::debug!(
            entry_id = entry.id,
            matter_id = entry.matter_id,
            billable = entry.is_billable,
            "created time entry"
        );
        Ok(entry)
    }

    /// Time entries, optionally filtered to one matter, each joined
    /// against the current timekeeper and matter collections. A
    /// reference that no longer resolves yields "Unknown" fields.
    /// Ordered by entry date descending, then creation time descending.
    pub async fn get_time_entries(
        &self,
        matter_id: Option<i64>,
    ) -> Result<Vec<TimeEntryView>, BillingError> {
        let entries: Vec<TimeEntry> = self.read_collection(Collection::TimeEntries).await?;
        let timekeepers: Vec<Timekeeper> = self.read_collection(Collection::Timekeepers).await?;
        let matters: Vec<Matter> = self.read_collection(Collection::Matters).await?;

        let mut views: Vec<TimeEntryView> = entries
            .into_iter()
            .filter(|entry| matter_id.is_none_or(|id| entry.matter_id == id))
            .map(|entry| {
                let timekeeper = timekeepers.iter().find(|t| t.id == entry.timekeeper_id);
                let matter = matters.iter().find(|m| m.id == entry.matter_id);
                TimeEntryView {
                    timekeeper_name: timekeeper
                        .map(|t| t.name.clone())
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    client_name: matter
                        .map(|m| m.client_name.clone())
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    matter_number: matter
                        .map(|m| m.matter_number.clone())
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    matter_name: matter
                        .map(|m| m.matter_name.clone())
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    entry,
                }
            })
            .collect();

        views.sort_by(|a, b| {
            b.entry
                .date
                .cmp(&a.entry.date)
                .then_with(|| b.entry.created_at.cmp(&a.entry.created_at))
        });
        Ok(views)
    }

    pub async fn get_time_entry(&self, id: i64) -> Result<Option<TimeEntry>, BillingError> {
        let entries: Vec<TimeEntry> = self.read_collection(Collection::TimeEntries).await?;
        Ok(entries.into_iter().find(|entry| entry.id == id))
    }

    /// Merge partial fields into an existing entry. The id and
    /// creation timestamp are immutable; `override_rate` can be set or
    /// cleared via the nested option.
    pub async fn update_time_entry(
        &self,
        id: i64,
        input: &UpdateTimeEntryParams,
    ) -> Result<TimeEntry, BillingError> {
        let _guard = self.locks.get(Collection::TimeEntries).lock().await;
        let mut entries: Vec<TimeEntry> = self.read_collection(Collection::TimeEntries).await?;

        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(BillingError::NotFound {
                entity: Entity::TimeEntry,
                id,
            })?;

        if let Some(matter_id) = input.matter_id {
            entry.matter_id = matter_id;
        }
        if let Some(timekeeper_id) = input.timekeeper_id {
            entry.timekeeper_id = timekeeper_id;
        }
        if let Some(date) = input.date {
            entry.date = date;
        }
        if let Some(hours) = input.hours {
            entry.hours = hours;
        }
        if let Some(description) = &input.description {
            entry.description = description.clone();
        }
        if let Some(is_billable) = input.is_billable {
            entry.is_billable = is_billable;
        }
        if let Some(override_rate) = input.override_rate {
            entry.override_rate = override_rate;
        }

        let updated = entry.clone();
        self.write_collection(Collection::TimeEntries, &entries)
            .await?;
        tracing::debug!(entry_id = id, "updated time entry");
        Ok(updated)
    }

    pub async fn delete_time_entry(&self, id: i64) -> Result<(), BillingError> {
        let _guard = self.locks.get(Collection::TimeEntries).lock().await;
        let entries: Vec<TimeEntry> = self.read_collection(Collection::TimeEntries).await?;

        let before = entries.len();
        let kept: Vec<TimeEntry> = entries.into_iter().filter(|entry| entry.id != id).collect();
        if kept.len() == before {
            return Err(BillingError::NotFound {
                entity: Entity::TimeEntry,
                id,
            });
        }

        self.write_collection(Collection::TimeEntries, &kept).await?;
        tracing::debug!(entry_id = id, "deleted time entry");
        Ok(())
    }
}
