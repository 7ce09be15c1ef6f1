use std::collections::HashMap;

use rust_decimal::Decimal;

use super::BillingEngine;
use crate::error::BillingError;
use crate::model::{
    BillingSummary, MatterRate, TimeEntry, Timekeeper, TimekeeperBreakdown, UNKNOWN_NAME,
};
use crate::store::Collection;

impl BillingEngine {
    /// Aggregate billable and non-billable totals for one matter.
    ///
    /// The effective rate of each entry resolves with strict
    /// precedence: the entry's own override, else the matter override
    /// for the entry's timekeeper, else the timekeeper's standard
    /// rate, else zero when the timekeeper no longer exists. Billable
    /// entries feed the totals and the per-timekeeper breakdown;
    /// non-billable entries only add to the non-billable hour count.
    ///
    /// Breakdown buckets appear in first-encountered order, and each
    /// bucket's `rate_used` is the rate of the entry that opened it.
    /// No rounding is applied here.
    pub async fn billing_summary(&self, matter_id: i64) -> Result<BillingSummary, BillingError> {
        let entries: Vec<TimeEntry> = self.read_collection(Collection::TimeEntries).await?;
        let timekeepers: Vec<Timekeeper> = self.read_collection(Collection::Timekeepers).await?;
        let matter_rates: Vec<MatterRate> = self.read_collection(Collection::MatterRates).await?;

        let mut total_billable_hours = Decimal::ZERO;
        let mut total_non_billable_hours = Decimal::ZERO;
        let mut total_billable_amount = Decimal::ZERO;
        let mut breakdown: Vec<TimekeeperBreakdown> = Vec::new();
        let mut bucket_index: HashMap<i64, usize> = HashMap::new();

        for entry in entries.iter().filter(|e| e.matter_id == matter_id) {
            let timekeeper = timekeepers.iter().find(|t| t.id == entry.timekeeper_id);
            let matter_rate = matter_rates
                .iter()
                .find(|r| r.matter_id == entry.matter_id && r.timekeeper_id == entry.timekeeper_id);

            let rate = entry
                .override_rate
                .or(matter_rate.map(|r| r.override_rate))
                .or(timekeeper.map(|t| t.standard_rate))
                .unwrap_or(Decimal::ZERO);

            if !entry.is_billable {
                total_non_billable_hours += entry.hours;
                continue;
            }

            total_billable_hours += entry.hours;
            total_billable_amount += entry.hours * rate;

            let slot = *bucket_index.entry(entry.timekeeper_id).or_insert_with(|| {
                breakdown.push(TimekeeperBreakdown {
                    timekeeper_name: timekeeper
                        .map(|t| t.name.clone())
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    billable_hours: Decimal::ZERO,
                    billable_amount: Decimal::ZERO,
                    rate_used: rate,
                });
                breakdown.len() - 1
            });
            breakdown[slot].billable_hours += entry.hours;
            breakdown[slot].billable_amount += entry.hours * rate;
        }

        Ok(BillingSummary {
            total_billable_hours,
            total_non_billable_hours,
            total_billable_amount,
            timekeeper_breakdown: breakdown,
        })
    }
}
