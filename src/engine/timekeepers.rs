use chrono::Utc;

use super::{BillingEngine, case_aware_name_cmp, next_id};
use crate::error::BillingError;
use crate::model::{CreateTimekeeperParams, Timekeeper};
use crate::store::Collection;

impl BillingEngine {
    /// Create a timekeeper. No uniqueness check on the name; two
    /// billers may legitimately share one.
    pub async fn create_timekeeper(
        &self,
        input: &CreateTimekeeperParams,
    ) -> Result<Timekeeper, BillingError> {
        let _guard = self.locks.get(Collection::Timekeepers).lock().await;
        let mut timekeepers: Vec<Timekeeper> =
            self.read_collection(Collection::Timekeepers).await?;

        let timekeeper = Timekeeper {
            id: next_id(&timekeepers),
            name: input.name.clone(),
            rate_tier: input.rate_tier,
            standard_rate: input.standard_rate,
            created_at: Utc::now(),
        };

        timekeepers.push(timekeeper.clone());
        self.write_collection(Collection::Timekeepers, &timekeepers)
            .await?;
        tracing::debug!(
            timekeeper_id = timekeeper.id,
            rate_tier = timekeeper.rate_tier.as_str(),
            "created timekeeper"
        );
        Ok(timekeeper)
    }

    /// All timekeepers, sorted by name ascending.
    pub async fn get_timekeepers(&self) -> Result<Vec<Timekeeper>, BillingError> {
        let mut timekeepers: Vec<Timekeeper> =
            self.read_collection(Collection::Timekeepers).await?;
        timekeepers.sort_by(|a, b| case_aware_name_cmp(&a.name, &b.name));
        Ok(timekeepers)
    }
}
