use chrono::Utc;
use rust_decimal::Decimal;

use super::{BillingEngine, next_id};
use crate::error::BillingError;
use crate::model::MatterRate;
use crate::store::Collection;

impl BillingEngine {
    /// Upsert the hourly override for a (matter, timekeeper) pair.
    /// An existing row is mutated in place; otherwise a new row is
    /// appended. Keeps at most one row per pair.
    pub async fn set_matter_rate(
        &self,
        matter_id: i64,
        timekeeper_id: i64,
        override_rate: Decimal,
    ) -> Result<MatterRate, BillingError> {
        let _guard = self.locks.get(Collection::MatterRates).lock().await;
        let mut rates: Vec<MatterRate> = self.read_collection(Collection::MatterRates).await?;

        let rate = match rates
            .iter_mut()
            .find(|r| r.matter_id == matter_id && r.timekeeper_id == timekeeper_id)
        {
            Some(existing) => {
                existing.override_rate = override_rate;
                existing.clone()
            }
            None => {
                let created = MatterRate {
                    id: next_id(&rates),
                    matter_id,
                    timekeeper_id,
                    override_rate,
                    created_at: Utc::now(),
                };
                rates.push(created.clone());
                created
            }
        };

        self.write_collection(Collection::MatterRates, &rates)
            .await?;
        tracing::debug!(
            matter_id,
            timekeeper_id,
            rate = %override_rate,
            "set matter rate"
        );
        Ok(rate)
    }

    pub async fn get_matter_rate(
        &self,
        matter_id: i64,
        timekeeper_id: i64,
    ) -> Result<Option<MatterRate>, BillingError> {
        let rates: Vec<MatterRate> = self.read_collection(Collection::MatterRates).await?;
        Ok(rates
            .into_iter()
            .find(|r| r.matter_id == matter_id && r.timekeeper_id == timekeeper_id))
    }
}
