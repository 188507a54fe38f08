/// Migration runner tests
///
/// End-to-end runs of the backfill against an in-memory store, with a
/// recording wrapper to observe commits and inject failures.
/// Run with: cargo test --test migration_runner_tests
use async_trait::async_trait;
use products_backfill::{
    DocumentStore, Fields, MemoryDocumentStore, MigrationConfig, MigrationError, MigrationPhase,
    MigrationRunner, ProductDocument, Result, WriteBatch,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Delegates to a memory store, records batch sizes, optionally fails one commit
struct RecordingStore {
    inner: MemoryDocumentStore,
    commits: Mutex<Vec<usize>>,
    fail_on_commit: Option<usize>,
}

impl RecordingStore {
    fn new() -> Self {
        Self {
            inner: MemoryDocumentStore::new(),
            commits: Mutex::new(Vec::new()),
            fail_on_commit: None,
        }
    }

    fn failing_on(commit_number: usize) -> Self {
        Self {
            fail_on_commit: Some(commit_number),
            ..Self::new()
        }
    }

    fn commit_sizes(&self) -> Vec<usize> {
        self.commits.lock().unwrap().clone()
    }

    async fn seed(&self, id: &str, value: Value) {
        self.inner.insert("products", id, fields(value)).await;
    }

    async fn active(&self, id: &str) -> Option<Value> {
        self.inner
            .get("products", id)
            .await
            .and_then(|doc| doc.get("active").cloned())
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn scan(&self, collection: &str) -> Result<Vec<ProductDocument>> {
        self.inner.scan(collection).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        let number = {
            let mut commits = self.commits.lock().unwrap();
            commits.push(batch.len());
            commits.len()
        };
        if self.fail_on_commit == Some(number) {
            return Err(MigrationError::Io("deadline exceeded".to_string()));
        }
        self.inner.commit(batch).await
    }
}

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

async fn seed_needing_updates(store: &RecordingStore, count: usize) {
    for i in 0..count {
        store.seed(&format!("p{i:04}"), json!({ "status": "active" })).await;
    }
}

#[tokio::test]
async fn test_mixed_collection_backfill() {
    let store = Arc::new(RecordingStore::new());
    store.seed("doc1", json!({ "status": "active" })).await;
    store.seed("doc2", json!({ "status": "inactive", "active": true })).await;
    store.seed("doc3", json!({ "active": false })).await;

    let mut runner = MigrationRunner::new(store.clone(), MigrationConfig::default()).unwrap();
    let report = runner.run().await.unwrap();

    assert_eq!(report.scanned, 3);
    assert_eq!(report.updated, 3);
    assert_eq!(report.batches_committed, 1);
    assert_eq!(store.active("doc1").await, Some(Value::Bool(true)));
    assert_eq!(store.active("doc2").await, Some(Value::Bool(false)));
    assert_eq!(store.active("doc3").await, Some(Value::Bool(true)));
    assert_eq!(runner.phase(), MigrationPhase::Done);
}

#[tokio::test]
async fn test_thousand_updates_commit_in_three_batches() {
    let store = Arc::new(RecordingStore::new());
    seed_needing_updates(&store, 1000).await;

    let mut runner = MigrationRunner::new(store.clone(), MigrationConfig::default()).unwrap();
    let report = runner.run().await.unwrap();

    assert_eq!(report.updated, 1000);
    assert_eq!(report.batches_committed, 3);
    assert_eq!(store.commit_sizes(), vec![400, 400, 200]);
}

#[tokio::test]
async fn test_commit_count_is_ceiling_of_batch_size() {
    let cases = [
        (1, 400, vec![1]),
        (400, 400, vec![400]),
        (401, 400, vec![400, 1]),
        (10, 3, vec![3, 3, 3, 1]),
    ];
    for (count, batch_size, expected) in cases {
        let store = Arc::new(RecordingStore::new());
        seed_needing_updates(&store, count).await;

        let config = MigrationConfig::new().batch_size(batch_size);
        let mut runner = MigrationRunner::new(store.clone(), config).unwrap();
        runner.run().await.unwrap();

        assert_eq!(store.commit_sizes(), expected, "{count} updates at batch size {batch_size}");
    }
}

#[tokio::test]
async fn test_failed_last_batch_keeps_earlier_batches() {
    let store = Arc::new(RecordingStore::failing_on(3));
    seed_needing_updates(&store, 1000).await;

    let mut runner = MigrationRunner::new(store.clone(), MigrationConfig::default()).unwrap();
    let err = runner.run().await.unwrap_err();

    match err {
        MigrationError::Write { batch, committed, message } => {
            assert_eq!(batch, 3);
            assert_eq!(committed, 800);
            assert!(message.contains("deadline exceeded"));
        }
        other => panic!("expected write error, got {other:?}"),
    }
    assert_eq!(store.commit_sizes(), vec![400, 400, 200]);
    assert_eq!(runner.phase(), MigrationPhase::Failed);

    let snapshot = store.inner.snapshot().await;
    let applied = snapshot.collections["products"]
        .values()
        .filter(|doc| doc.get("active") == Some(&Value::Bool(true)))
        .count();
    assert_eq!(applied, 800);
}

#[tokio::test]
async fn test_failed_batch_stops_remaining_batches() {
    let store = Arc::new(RecordingStore::failing_on(2));
    seed_needing_updates(&store, 1000).await;

    let mut runner = MigrationRunner::new(store.clone(), MigrationConfig::default()).unwrap();
    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, MigrationError::Write { batch: 2, committed: 400, .. }));
    assert_eq!(store.commit_sizes(), vec![400, 400]);
    assert_eq!(store.active("p0000").await, Some(Value::Bool(true)));
    assert_eq!(store.active("p0999").await, None);
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let store = Arc::new(RecordingStore::new());
    store.seed("a", json!({ "status": "active" })).await;
    store.seed("b", json!({ "status": "discontinued" })).await;
    store.seed("c", json!({})).await;

    let mut first = MigrationRunner::new(store.clone(), MigrationConfig::default()).unwrap();
    assert_eq!(first.run().await.unwrap().updated, 3);

    let mut second = MigrationRunner::new(store.clone(), MigrationConfig::default()).unwrap();
    let report = second.run().await.unwrap();
    assert_eq!(report.scanned, 3);
    assert_eq!(report.updated, 0);
    assert_eq!(report.batches_committed, 0);
    assert_eq!(store.commit_sizes(), vec![3]);
}

#[tokio::test]
async fn test_missing_flag_written_even_when_false() {
    let store = Arc::new(RecordingStore::new());
    store.seed("retired", json!({ "status": "retired" })).await;
    store.seed("synced", json!({ "status": "retired", "active": false })).await;

    let mut runner = MigrationRunner::new(store.clone(), MigrationConfig::default()).unwrap();
    let report = runner.run().await.unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(store.active("retired").await, Some(Value::Bool(false)));
}

#[tokio::test]
async fn test_only_active_field_is_written() {
    let store = Arc::new(RecordingStore::new());
    store
        .seed(
            "sku",
            json!({ "status": "paused", "name": "Lamp", "price": 12.5, "tags": ["home"] }),
        )
        .await;

    let mut runner = MigrationRunner::new(store.clone(), MigrationConfig::default()).unwrap();
    runner.run().await.unwrap();

    let stored = store.inner.get("products", "sku").await.unwrap();
    assert_eq!(
        Value::Object(stored),
        json!({
            "status": "paused",
            "name": "Lamp",
            "price": 12.5,
            "tags": ["home"],
            "active": false
        })
    );
}

#[tokio::test]
async fn test_other_collections_are_untouched() {
    let store = Arc::new(RecordingStore::new());
    store.seed("a", json!({ "status": "active" })).await;
    store.inner.insert("orders", "o1", fields(json!({ "status": "active" }))).await;

    let mut runner = MigrationRunner::new(store.clone(), MigrationConfig::default()).unwrap();
    runner.run().await.unwrap();

    assert_eq!(
        store.inner.get("orders", "o1").await,
        Some(fields(json!({ "status": "active" })))
    );
}

#[tokio::test]
async fn test_scan_failure_is_connection_error() {
    struct UnreachableStore;

    #[async_trait]
    impl DocumentStore for UnreachableStore {
        async fn scan(&self, _collection: &str) -> Result<Vec<ProductDocument>> {
            Err(MigrationError::Io("connection reset".to_string()))
        }

        async fn commit(&self, _batch: WriteBatch) -> Result<()> {
            panic!("commit must not be reached");
        }
    }

    let mut runner =
        MigrationRunner::new(Arc::new(UnreachableStore), MigrationConfig::default()).unwrap();
    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, MigrationError::Connection(ref msg) if msg.contains("connection reset")));
    assert_eq!(runner.phase(), MigrationPhase::Failed);
}
