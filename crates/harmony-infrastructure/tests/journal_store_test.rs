use std::sync::Arc;

use harmony_core::chart::RadarChart;
use harmony_core::journal::{JournalRecord, JournalStore};
use harmony_infrastructure::firebase::dto::JournalEntryDto;
use harmony_infrastructure::{ConfigStorage, InMemoryJournalStore};
use tempfile::TempDir;

#[tokio::test]
async fn test_store_behind_trait_object() {
    let memory = Arc::new(InMemoryJournalStore::new());
    let store: Arc<dyn JournalStore> = memory.clone();

    store
        .save_entry(JournalRecord::user_identity("Ada"))
        .await
        .unwrap();
    store
        .save_entry(JournalRecord::self_architecture(
            &RadarChart::default().snapshot(),
        ))
        .await
        .unwrap();
    assert_eq!(store.fetch_summary().await.unwrap(), None);

    let entries = memory.entries().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].kind(), "self_architecture");
}

#[test]
fn test_architecture_entry_wire_shape() {
    let record = JournalRecord::self_architecture(&RadarChart::default().snapshot());
    let value = serde_json::to_value(JournalEntryDto::from(&record)).unwrap();
    assert_eq!(value["type"], "self_architecture");
    assert_eq!(value["timestamp"][".sv"], "timestamp");
    assert_eq!(value["metrics"]["Propriate striving"], 0.5);
    assert_eq!(
        value["description"],
        "User's self-assessed psychological architecture (Current vs Ideal)"
    );
}

#[test]
fn test_config_file_round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[persistence]
api_key = "AIza-demo"
database_url = "https://demo.firebaseio.com"

[chart]
hit_radius = 24.0
"#,
    )
    .unwrap();

    let config = ConfigStorage::new(path).load().unwrap();
    assert!(config.persistence.is_configured());
    assert_eq!(config.persistence.app_id, "harmony-self-local");
    assert_eq!(config.chart.hit_radius, 24.0);
    assert_eq!(config.chart.frame_interval_ms, 16);
}
