//! Persistence fidelity through the JSON file backend: records written
//! by one engine instance are read back identically by another bound
//! to the same data directory.

use std::sync::Arc;
use std::sync::Once;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use timeledger::BillingEngine;
use timeledger::model::{
    CreateClientParams, CreateMatterParams, CreateTimeEntryParams, CreateTimekeeperParams,
    RateTier,
};
use timeledger::store::JsonFileStore;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "timeledger=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

async fn engine_at(dir: &std::path::Path) -> BillingEngine {
    let store = JsonFileStore::open(dir).await.expect("open store");
    BillingEngine::new(Arc::new(store))
}

#[tokio::test]
async fn collections_round_trip_across_engine_instances() {
    init_tracing();
    let tmp = tempfile::tempdir().expect("tempdir");

    let client;
    let matter;
    let keeper;
    let entry;
    let rate;
    {
        let engine = engine_at(tmp.path()).await;
        client = engine
            .create_client(&CreateClientParams {
                name: "Acme".to_string(),
                description: Some("Industrial conglomerate".to_string()),
                address: Some("1 Anvil Way".to_string()),
                contact_name: Some("W. Coyote".to_string()),
                contact_phone: Some("555-0100".to_string()),
                contact_email: Some("legal@acme.test".to_string()),
            })
            .await
            .expect("create client");
        matter = engine
            .create_matter(&CreateMatterParams {
                client_id: client.id,
                matter_name: "IPO".to_string(),
                description: "Initial public offering".to_string(),
                status: None,
            })
            .await
            .expect("create matter");
        keeper = engine
            .create_timekeeper(&CreateTimekeeperParams {
                name: "Jordan".to_string(),
                rate_tier: RateTier::SeniorAssociate,
                standard_rate: dec!(450),
            })
            .await
            .expect("create timekeeper");
        entry = engine
            .create_time_entry(&CreateTimeEntryParams {
                matter_id: matter.id,
                timekeeper_id: keeper.id,
                date: "2026-02-10".parse().expect("valid date"),
                hours: dec!(2.5),
                description: "Prospectus review".to_string(),
                is_billable: true,
                override_rate: Some(dec!(475)),
            })
            .await
            .expect("create entry");
        rate = engine
            .set_matter_rate(matter.id, keeper.id, dec!(460))
            .await
            .expect("set rate");
    }

    // A fresh engine over the same directory sees identical records.
    let reopened = engine_at(tmp.path()).await;

    let clients = reopened.get_clients().await.expect("clients");
    assert_eq!(clients, vec![client.clone()]);

    let loaded_matter = reopened
        .get_matter(matter.id)
        .await
        .expect("get matter")
        .expect("matter exists");
    assert_eq!(loaded_matter, matter);

    let keepers = reopened.get_timekeepers().await.expect("timekeepers");
    assert_eq!(keepers, vec![keeper.clone()]);

    let loaded_entry = reopened
        .get_time_entry(entry.id)
        .await
        .expect("get entry")
        .expect("entry exists");
    assert_eq!(loaded_entry, entry);

    let loaded_rate = reopened
        .get_matter_rate(matter.id, keeper.id)
        .await
        .expect("get rate")
        .expect("rate exists");
    assert_eq!(loaded_rate, rate);

    // The aggregation works off the reloaded snapshots too; the entry
    // override still wins over the matter rate.
    let summary = reopened.billing_summary(matter.id).await.expect("summary");
    assert_eq!(summary.total_billable_amount, dec!(1187.5));
}

#[tokio::test]
async fn numbering_continues_across_restarts() {
    init_tracing();
    let tmp = tempfile::tempdir().expect("tempdir");

    {
        let engine = engine_at(tmp.path()).await;
        let first = engine
            .create_client(&CreateClientParams::named("Acme"))
            .await
            .expect("create");
        assert_eq!(first.client_number, "000000");
    }

    let reopened = engine_at(tmp.path()).await;
    let second = reopened
        .create_client(&CreateClientParams::named("Beta"))
        .await
        .expect("create");
    assert_eq!(second.client_number, "000001");
    assert_eq!(second.id, 2);
}

#[tokio::test]
async fn corrupt_collection_blob_is_a_hard_error() {
    init_tracing();
    let tmp = tempfile::tempdir().expect("tempdir");
    tokio::fs::write(tmp.path().join("clients.json"), "not json")
        .await
        .expect("seed corrupt blob");

    let engine = engine_at(tmp.path()).await;
    let err = engine.get_clients().await.expect_err("corrupt blob");
    assert!(matches!(
        err,
        timeledger::BillingError::Serialization(_)
    ));
}
