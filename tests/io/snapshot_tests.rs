use crate::common::FIXED_TIMESTAMP;
use instance_ranker::core::io::{read_snapshot, write_snapshot};
use instance_ranker::core::probe::types::{FleetSnapshot, InstanceRecord, InstanceType};
use tempfile::TempDir;

fn sample() -> FleetSnapshot {
    vec![
        InstanceRecord {
            url: "https://piped.example".to_string(),
            instance_type: InstanceType::Piped,
            score: 100,
            latency_display: "412ms".to_string(),
            cors_ok: true,
            observed_at: FIXED_TIMESTAMP.to_string(),
        },
        InstanceRecord {
            url: "https://yt.example".to_string(),
            instance_type: InstanceType::Invidious,
            score: 65,
            latency_display: "1500ms".to_string(),
            cors_ok: false,
            observed_at: FIXED_TIMESTAMP.to_string(),
        },
    ]
}

#[tokio::test]
async fn test_snapshot_field_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("healthy_instances.json");

    write_snapshot(&path, &sample()).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let first = &raw[0];
    assert_eq!(first["url"], "https://piped.example");
    assert_eq!(first["type"], "piped");
    assert_eq!(first["score"], 100);
    assert_eq!(first["latency"], "412ms");
    assert_eq!(first["cors"], true);
    assert_eq!(first["last_updated"], FIXED_TIMESTAMP);
    assert_eq!(first.as_object().unwrap().len(), 6);
    assert_eq!(raw[1]["type"], "invidious");
}

#[tokio::test]
async fn test_snapshot_fully_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("healthy_instances.json");

    write_snapshot(&path, &sample()).await.unwrap();
    write_snapshot(&path, &vec![]).await.unwrap();

    assert!(read_snapshot(&path).await.unwrap().is_empty());
    assert!(!path.with_extension("tmp").exists());
}

#[tokio::test]
async fn test_snapshot_read_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("out.json");

    write_snapshot(&path, &sample()).await.unwrap();

    assert_eq!(read_snapshot(&path).await.unwrap(), sample());
}

#[tokio::test]
async fn test_read_missing_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    assert!(read_snapshot(&dir.path().join("absent.json")).await.is_err());
}
