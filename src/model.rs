//! Persisted records, parameter bags, and enums for the billing engine.
//!
//! Every record is a flat row keyed by a process-unique positive `i64`
//! id. Timestamps are ISO-8601 UTC; money and hours use `Decimal` so
//! aggregation stays exact (presentation layers do the rounding).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder for joined names whose referenced row no longer exists.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Matter lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatterStatus {
    Active,
    OnHold,
    Closed,
}

impl MatterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Closed => "closed",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "on_hold" => Some(Self::OnHold),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Billing seniority band. Informational only: it never feeds the rate
/// resolution, which uses `standard_rate` and overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateTier {
    Partner,
    SeniorAssociate,
    JuniorAssociate,
    Paralegal,
}

impl RateTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Partner => "partner",
            Self::SeniorAssociate => "senior_associate",
            Self::JuniorAssociate => "junior_associate",
            Self::Paralegal => "paralegal",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "partner" => Some(Self::Partner),
            "senior_associate" => Some(Self::SeniorAssociate),
            "junior_associate" => Some(Self::JuniorAssociate),
            "paralegal" => Some(Self::Paralegal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    /// Zero-padded 6-digit sequence assigned at creation as the count
    /// of clients then in the store. Count-based, so numbers repeat
    /// after a delete-then-create; never reassigned on update.
    pub client_number: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matter {
    pub id: i64,
    pub client_id: i64,
    /// Snapshot of the client's name at creation time. Not kept in
    /// sync with later client renames.
    pub client_name: String,
    /// Zero-padded 4-digit sequence, count-based within the client's
    /// matter set at creation time.
    pub matter_number: String,
    pub matter_name: String,
    pub description: String,
    pub status: MatterStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timekeeper {
    pub id: i64,
    pub name: String,
    pub rate_tier: RateTier,
    pub standard_rate: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub matter_id: i64,
    pub timekeeper_id: i64,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub description: String,
    pub is_billable: bool,
    /// Entry-level rate override; beats both the matter override and
    /// the timekeeper's standard rate for this single entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Per-(matter, timekeeper) hourly rate override. The upsert in
/// `set_matter_rate` keeps at most one row per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatterRate {
    pub id: i64,
    pub matter_id: i64,
    pub timekeeper_id: i64,
    pub override_rate: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Time entry enriched with names joined from the current timekeeper
/// and matter collections. The joins are point-in-time: a missing
/// reference yields [`UNKNOWN_NAME`] rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntryView {
    pub entry: TimeEntry,
    pub timekeeper_name: String,
    pub client_name: String,
    pub matter_number: String,
    pub matter_name: String,
}

#[derive(Debug, Clone)]
pub struct CreateClientParams {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl CreateClientParams {
    /// Name-only convenience; every optional field defaults to empty.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            address: None,
            contact_name: None,
            contact_phone: None,
            contact_email: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClientParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateMatterParams {
    pub client_id: i64,
    pub matter_name: String,
    pub description: String,
    pub status: Option<MatterStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMatterParams {
    pub client_id: Option<i64>,
    pub client_name: Option<String>,
    pub matter_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<MatterStatus>,
}

#[derive(Debug, Clone)]
pub struct CreateTimekeeperParams {
    pub name: String,
    pub rate_tier: RateTier,
    pub standard_rate: Decimal,
}

#[derive(Debug, Clone)]
pub struct CreateTimeEntryParams {
    pub matter_id: i64,
    pub timekeeper_id: i64,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub description: String,
    pub is_billable: bool,
    pub override_rate: Option<Decimal>,
}

/// Partial update for a time entry. The outer `Option` means "leave
/// unchanged"; for `override_rate` the inner `Option` distinguishes
/// setting a new override from clearing it.
#[derive(Debug, Clone, Default)]
pub struct UpdateTimeEntryParams {
    pub matter_id: Option<i64>,
    pub timekeeper_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub hours: Option<Decimal>,
    pub description: Option<String>,
    pub is_billable: Option<bool>,
    pub override_rate: Option<Option<Decimal>>,
}

/// Per-timekeeper slice of a billing summary.
///
/// `rate_used` keeps whichever rate opened the bucket; entries that
/// land in an existing bucket only add hours and amount, even when
/// their resolved rate differs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimekeeperBreakdown {
    pub timekeeper_name: String,
    pub billable_hours: Decimal,
    pub billable_amount: Decimal,
    pub rate_used: Decimal,
}

/// Aggregated billable/non-billable totals for one matter, broken down
/// by timekeeper in first-encountered order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingSummary {
    pub total_billable_hours: Decimal,
    pub total_non_billable_hours: Decimal,
    pub total_billable_amount: Decimal,
    pub timekeeper_breakdown: Vec<TimekeeperBreakdown>,
}

/// Rows addressable by their integer id.
pub(crate) trait Keyed {
    fn id(&self) -> i64;
}

macro_rules! impl_keyed {
    ($($record:ty),* $(,)?) => {
        $(impl Keyed for $record {
            fn id(&self) -> i64 {
                self.id
            }
        })*
    };
}

impl_keyed!(Client, Matter, Timekeeper, TimeEntry, MatterRate);

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::{MatterStatus, RateTier, TimeEntry};

    #[test]
    fn matter_status_round_trips_db_values() {
        for status in [
            MatterStatus::Active,
            MatterStatus::OnHold,
            MatterStatus::Closed,
        ] {
            assert_eq!(MatterStatus::from_db_value(status.as_str()), Some(status));
        }
        assert_eq!(MatterStatus::from_db_value("archived"), None);
    }

    #[test]
    fn rate_tier_round_trips_db_values() {
        for tier in [
            RateTier::Partner,
            RateTier::SeniorAssociate,
            RateTier::JuniorAssociate,
            RateTier::Paralegal,
        ] {
            assert_eq!(RateTier::from_db_value(tier.as_str()), Some(tier));
        }
        assert_eq!(RateTier::from_db_value("of_counsel"), None);
    }

    #[test]
    fn time_entry_omits_absent_override_rate() {
        let entry = TimeEntry {
            id: 1,
            matter_id: 1,
            timekeeper_id: 1,
            date: "2026-01-15".parse().expect("valid date"),
            hours: Decimal::new(25, 1),
            description: "Draft motion".to_string(),
            is_billable: true,
            override_rate: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&entry).expect("serialize entry");
        assert!(!json.contains("override_rate"));

        let parsed: TimeEntry = serde_json::from_str(&json).expect("deserialize entry");
        assert_eq!(parsed, entry);
    }
}
