//! Local-first time-and-billing core for a small legal practice.
//!
//! The crate has two layers:
//!
//! - [`store`]: a generic whole-collection record store over a local
//!   key-value namespace (in-memory or one JSON file per collection).
//! - [`engine`]: entity operations for clients, matters, timekeepers,
//!   time entries, and per-matter rate overrides, plus the billing
//!   summary aggregation that resolves the three-tier rate precedence
//!   (entry override, then matter override, then standard rate).
//!
//! All operations are exposed as async for interface uniformity; every
//! call completes without blocking on anything but the local store.
//! Each write is a whole-collection read-modify-write serialized by a
//! per-collection lock, so the engine is safe to share across tasks
//! while keeping the original single-writer semantics.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod store;

pub use config::{StoreBackend, StoreConfig};
pub use engine::BillingEngine;
pub use error::{BillingError, ConfigError};
