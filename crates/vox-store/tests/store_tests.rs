//! Integration tests for the feedback store: durability, self-healing
//! initialization, legacy-shape normalization, and batch commits.

use std::fs;

use vox_store::{
    FeedbackDraft, FeedbackStore, Sentiment, StoreError, DEFAULT_BATCH_SOURCE, DEFAULT_SOURCE,
    DEFAULT_STORE_FILE,
};

fn temp_store() -> (tempfile::TempDir, FeedbackStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FeedbackStore::open(dir.path().join(DEFAULT_STORE_FILE));
    (dir, store)
}

#[test]
fn append_then_read_all_round_trips_last_element() {
    let (_dir, store) = temp_store();

    store
        .append(FeedbackDraft::new("checkout was quick", Sentiment::Positive))
        .unwrap();
    let appended = store
        .append(FeedbackDraft::new("app crashed twice", Sentiment::Negative).with_score(0.85))
        .unwrap();

    let all = store.read_all().unwrap();
    assert_eq!(all.len(), 2);
    let last = all.last().unwrap();
    assert_eq!(last, &appended);
    assert_eq!(last.sentiment, Sentiment::Negative);
    assert_eq!(last.source, DEFAULT_SOURCE);
    assert_eq!(last.score, Some(0.85));
}

#[test]
fn lowercase_sentiment_label_is_normalized() {
    let (_dir, store) = temp_store();

    store
        .append(FeedbackDraft::new("Great service!", Sentiment::from("Positive")))
        .unwrap();
    store
        .append(FeedbackDraft::new("Terrible wait times", Sentiment::from("negative")))
        .unwrap();

    let all = store.read_all().unwrap();
    assert_eq!(all[1].sentiment, Sentiment::Negative);

    // Stored capitalized on disk
    let raw = fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("\"Negative\""));
    assert!(!raw.contains("\"negative\""));
}

#[test]
fn append_batch_grows_length_by_n_with_shared_source() {
    let (_dir, store) = temp_store();
    store
        .append(FeedbackDraft::new("earlier entry", Sentiment::Neutral))
        .unwrap();

    let before = chrono::Utc::now();
    let count = store
        .append_batch(
            vec![
                FeedbackDraft::new("a", Sentiment::Positive),
                FeedbackDraft::new("b", Sentiment::Negative),
            ],
            DEFAULT_BATCH_SOURCE,
        )
        .unwrap();
    assert_eq!(count, 2);

    let all = store.read_all().unwrap();
    assert_eq!(all.len(), 3);
    for record in &all[1..] {
        assert_eq!(record.source, DEFAULT_BATCH_SOURCE);
        assert!(record.timestamp >= before);
    }
    assert_eq!(all[1].text, "a");
    assert_eq!(all[2].text, "b");
}

#[test]
fn batch_with_empty_item_writes_nothing() {
    let (_dir, store) = temp_store();

    let err = store
        .append_batch(
            vec![
                FeedbackDraft::new("ok", Sentiment::Positive),
                FeedbackDraft::new("", Sentiment::Negative),
            ],
            DEFAULT_BATCH_SOURCE,
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(!store.path().exists());
}

#[test]
fn init_is_idempotent_on_well_formed_file() {
    let (_dir, store) = temp_store();
    store
        .append(FeedbackDraft::new("keep me", Sentiment::Positive))
        .unwrap();

    store.init().unwrap();
    store.init().unwrap();

    let all = store.read_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].text, "keep me");
}

#[test]
fn corrupt_file_is_quarantined_and_reset() {
    let (dir, store) = temp_store();
    fs::write(store.path(), "{not valid json").unwrap();

    let all = store.read_all().unwrap();
    assert!(all.is_empty());

    // Forensic copy preserved alongside the fresh container
    let quarantined = dir.path().join(format!("{DEFAULT_STORE_FILE}.corrupt"));
    assert_eq!(fs::read_to_string(quarantined).unwrap(), "{not valid json");

    // Store is fully usable again
    let record = store
        .append(FeedbackDraft::new("back in business", Sentiment::Positive))
        .unwrap();
    assert_eq!(store.read_all().unwrap(), vec![record]);
}

#[test]
fn structurally_wrong_container_is_treated_as_corrupt() {
    let (_dir, store) = temp_store();
    fs::write(store.path(), r#"{"entries": []}"#).unwrap();

    store.init().unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["feedback"], serde_json::json!([]));
}

#[test]
fn legacy_bare_array_is_accepted_and_normalized() {
    let (_dir, store) = temp_store();
    fs::write(
        store.path(),
        r#"[{"text": "old entry", "sentiment": "Positive", "source": "analysis",
             "timestamp": "2025-01-01T00:00:00Z"}]"#,
    )
    .unwrap();

    let all = store.read_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].text, "old entry");

    // Next read sees the canonical container shape on disk
    let raw = fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.get("feedback").is_some());
}

#[test]
fn malformed_entries_are_backfilled_or_skipped() {
    let (_dir, store) = temp_store();
    fs::write(
        store.path(),
        r#"{"feedback": [{}, 42, {"text": "partial", "sentiment": "negative"}]}"#,
    )
    .unwrap();

    let all = store.read_all().unwrap();
    // The bare number is dropped; the two objects survive with defaults
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].text, "");
    assert_eq!(all[0].sentiment, Sentiment::Neutral);
    assert_eq!(all[0].source, "unknown");
    assert_eq!(all[1].text, "partial");
    assert_eq!(all[1].sentiment, Sentiment::Negative);
}

#[test]
fn read_all_on_missing_file_returns_empty_and_initializes() {
    let (_dir, store) = temp_store();
    assert!(store.read_all().unwrap().is_empty());
    assert!(store.path().exists());
}

#[test]
fn concurrent_appends_are_all_committed() {
    let (_dir, store) = temp_store();
    let store = std::sync::Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || {
                for j in 0..5 {
                    store
                        .append(FeedbackDraft::new(
                            format!("writer {i} entry {j}"),
                            Sentiment::Neutral,
                        ))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.read_all().unwrap().len(), 40);
}
