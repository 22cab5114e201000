//! Snapshot summaries
//!
//! A [`Snapshot`] is the result of one full store read. Every summary is a
//! pure function of it: same snapshot in, same result out. Nothing here
//! mutates the store; the presentation layer polls, captures, and renders.

use indexmap::IndexMap;
use serde::Serialize;
use vox_store::{FeedbackRecord, FeedbackStore, Sentiment, StoreError};

/// Label of the placeholder bucket returned for an empty snapshot, so
/// pie-style charts always have one slice to draw
pub const NO_DATA_BUCKET: &str = "No Data";

/// Per-sentiment counts over one snapshot
///
/// # Invariants
/// - `positive + negative + neutral == total`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    /// Number of records in the snapshot
    pub total: usize,
    /// Records classified Positive
    pub positive: usize,
    /// Records classified Negative
    pub negative: usize,
    /// Records classified Neutral
    pub neutral: usize,
}

/// One record projected into the dashboard table's display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Raw feedback text
    #[serde(rename = "Feedback")]
    pub feedback: String,
    /// Capitalized sentiment label
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
    /// Append time, RFC 3339
    #[serde(rename = "Date")]
    pub date: String,
}

/// Immutable view of the store contents at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    records: Vec<FeedbackRecord>,
}

impl Snapshot {
    /// Capture the current store contents with one full read
    ///
    /// # Errors
    /// Fails only if the underlying [`FeedbackStore::read_all`] fails; an
    /// empty store yields an empty snapshot, not an error.
    pub fn capture(store: &FeedbackStore) -> Result<Self, StoreError> {
        Ok(Self {
            records: store.read_all()?,
        })
    }

    /// Build a snapshot from already-loaded records
    #[inline]
    #[must_use]
    pub fn from_records(records: Vec<FeedbackRecord>) -> Self {
        Self { records }
    }

    /// Records in insertion order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    /// Number of records captured
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count records per sentiment in a single pass
    #[must_use]
    pub fn counts(&self) -> SentimentCounts {
        let mut counts = SentimentCounts {
            total: self.records.len(),
            ..SentimentCounts::default()
        };
        for record in &self.records {
            match record.sentiment {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Negative => counts.negative += 1,
                Sentiment::Neutral => counts.neutral += 1,
            }
        }
        counts
    }

    /// Sentiment label → count, in fixed Positive/Negative/Neutral order
    ///
    /// Zero buckets are omitted. An empty snapshot yields the single
    /// sentinel bucket `{ "No Data": 1 }` rather than an empty mapping, so
    /// proportional charts always have something to render.
    #[must_use]
    pub fn breakdown(&self) -> IndexMap<String, usize> {
        if self.records.is_empty() {
            return IndexMap::from([(NO_DATA_BUCKET.to_string(), 1)]);
        }

        let counts = self.counts();
        let buckets = [
            (Sentiment::Positive, counts.positive),
            (Sentiment::Negative, counts.negative),
            (Sentiment::Neutral, counts.neutral),
        ];
        buckets
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(sentiment, count)| (sentiment.as_str().to_string(), count))
            .collect()
    }

    /// Project every record into table rows, preserving insertion order
    ///
    /// Applies no filtering or sorting; callers slice and dice client-side.
    #[must_use]
    pub fn rows(&self) -> Vec<TableRow> {
        self.records
            .iter()
            .map(|record| TableRow {
                feedback: record.text.clone(),
                sentiment: record.sentiment.as_str().to_string(),
                date: record.timestamp.to_rfc3339(),
            })
            .collect()
    }
}
