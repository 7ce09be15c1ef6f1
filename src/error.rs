use std::fmt;

use thiserror::Error;

/// Entity kinds named in `NotFound` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Client,
    Matter,
    TimeEntry,
}

impl Entity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Matter => "matter",
            Self::TimeEntry => "time entry",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures surfaced by the record store and the billing engine.
///
/// Lookups that may legitimately miss (`get_client`, `get_matter_rate`,
/// `get_time_entry`) return `Ok(None)` instead of an error; update and
/// delete raise `NotFound` because silently no-op-ing would hide caller
/// bugs.
#[derive(Debug, Error)]
pub enum BillingError {
    /// The local store could not be read or written.
    #[error("storage backend failure: {0}")]
    Storage(String),

    /// A persisted collection blob could not be decoded, or a record
    /// could not be encoded.
    #[error("serialization failure: {0}")]
    Serialization(String),

    /// An update or delete targeted an id that does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    /// `create_matter` was given a client_id that does not resolve.
    #[error("client {client_id} does not exist")]
    ClientNotFound { client_id: i64 },

    /// A required field failed validation before any write happened.
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

/// Configuration resolution failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::{BillingError, Entity};

    #[test]
    fn not_found_display_names_entity_and_id() {
        let err = BillingError::NotFound {
            entity: Entity::TimeEntry,
            id: 42,
        };
        assert_eq!(err.to_string(), "time entry 42 not found");
    }

    #[test]
    fn referential_violation_display_names_client() {
        let err = BillingError::ClientNotFound { client_id: 7 };
        assert_eq!(err.to_string(), "client 7 does not exist");
    }
}
