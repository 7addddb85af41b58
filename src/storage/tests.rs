//! Tests for the storage tiers

use super::*;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_memory_store_roundtrip() {
    let store = MemoryStore::new();

    assert!(store.is_empty());
    assert_eq!(store.read("missing").await.unwrap(), None);

    let value = json!({"enabled": true, "threshold": 10});
    store.write("config", &value).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.read("config").await.unwrap(), Some(value));
}

#[tokio::test]
async fn test_memory_store_overwrite() {
    let store = MemoryStore::new();

    store.write("key", &json!(1)).await.unwrap();
    store.write("key", &json!(2)).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.read("key").await.unwrap(), Some(json!(2)));
}

#[tokio::test]
async fn test_file_store_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp.path());

    assert_eq!(store.read("config").await.unwrap(), None);

    let value = json!({"version": "26", "enabledRulesets": ["default"]});
    store.write("config", &value).await.unwrap();

    assert_eq!(store.read("config").await.unwrap(), Some(value));
    assert!(temp.path().join("config.json").exists());
}

#[tokio::test]
async fn test_file_store_overwrite_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp.path());

    store.write("config", &json!({"a": 1})).await.unwrap();
    store.write("config", &json!({"a": 2})).await.unwrap();

    assert_eq!(store.read("config").await.unwrap(), Some(json!({"a": 2})));
    assert!(!temp.path().join("config.json.tmp").exists());
}

#[tokio::test]
async fn test_file_store_corrupt_file_is_a_read_error() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp.path());

    std::fs::write(temp.path().join("config.json"), "{not json").unwrap();

    let err = store.read("config").await.unwrap_err();
    assert!(matches!(err, StorageError::Read { .. }));
}

#[tokio::test]
async fn test_dual_tier_store_keeps_tiers_independent() {
    let session = std::sync::Arc::new(MemoryStore::new());
    let local = std::sync::Arc::new(MemoryStore::new());
    let store = DualTierStore::new(session.clone(), local.clone());

    store.write_session("key", &json!("ephemeral")).await.unwrap();
    store.write_local("key", &json!("durable")).await.unwrap();

    assert_eq!(store.read_session("key").await.unwrap(), Some(json!("ephemeral")));
    assert_eq!(store.read_local("key").await.unwrap(), Some(json!("durable")));
}
