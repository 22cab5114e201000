//! Testing utilities for the VOX workspace
//!
//! Shared fixtures: temp-directory-backed stores and sample records.

#![allow(missing_docs)]

use chrono::Utc;
use vox_store::{FeedbackDraft, FeedbackRecord, FeedbackStore, Sentiment, DEFAULT_STORE_FILE};

/// A store backed by a temp directory; the directory lives as long as the
/// fixture, so keep the whole struct in scope for the test's duration.
#[derive(Debug)]
pub struct TempStore {
    pub store: FeedbackStore,
    pub dir: tempfile::TempDir,
}

pub fn temp_store() -> TempStore {
    let dir = tempfile::tempdir().unwrap();
    let store = FeedbackStore::open(dir.path().join(DEFAULT_STORE_FILE));
    TempStore { store, dir }
}

pub fn draft(text: &str, sentiment: Sentiment) -> FeedbackDraft {
    FeedbackDraft::new(text, sentiment)
}

pub fn record(text: &str, sentiment: Sentiment) -> FeedbackRecord {
    FeedbackRecord {
        text: text.to_string(),
        sentiment,
        source: "analysis".to_string(),
        timestamp: Utc::now(),
        score: None,
    }
}

/// Store pre-seeded with one record per sentiment
pub fn seeded_store() -> TempStore {
    let fixture = temp_store();
    for (text, sentiment) in [
        ("love the new layout", Sentiment::Positive),
        ("support never answered", Sentiment::Negative),
        ("it works", Sentiment::Neutral),
    ] {
        fixture.store.append(draft(text, sentiment)).unwrap();
    }
    fixture
}
