//! Feedback record types
//!
//! Defines the persisted record shape, the sentiment enumeration, and the
//! caller-facing draft type. The persisted shape is deliberately permissive
//! on deserialization: entries missing fields are backfilled with defaults
//! rather than rejected, so one malformed entry can never poison a read of
//! the whole container.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag assigned to single appends when the caller supplies none
pub const DEFAULT_SOURCE: &str = "analysis";

/// Source tag conventionally used for batch appends
pub const DEFAULT_BATCH_SOURCE: &str = "batch_analysis";

/// Source tag backfilled for stored entries that lack one
const UNKNOWN_SOURCE: &str = "unknown";

/// Sentiment classification of one feedback record
///
/// Parsing from free text is permissive: the three labels match
/// ASCII-case-insensitively, and anything outside the enumeration
/// collapses to [`Sentiment::Neutral`]. The store therefore never holds
/// an out-of-enumeration sentiment value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Sentiment {
    /// Positive feedback
    Positive,
    /// Negative feedback
    Negative,
    /// Neutral feedback; also the fallback for unrecognized labels
    #[default]
    Neutral,
}

impl Sentiment {
    /// Parse a free-text label, collapsing unrecognized values to Neutral
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("positive") {
            Self::Positive
        } else if label.eq_ignore_ascii_case("negative") {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Capitalized label as stored on disk and shown in the dashboard
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl From<String> for Sentiment {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<&str> for Sentiment {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<Sentiment> for &'static str {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.as_str()
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted feedback observation
///
/// # Invariants
/// - `timestamp` is assigned by the store at append time (UTC)
/// - `sentiment` is always one of the three enumerated values
/// - `score`, when present, is expected in `[0.0, 1.0]`; the consuming
///   API layer clamps before calling the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Raw feedback content
    #[serde(default)]
    pub text: String,
    /// Sentiment classification
    #[serde(default)]
    pub sentiment: Sentiment,
    /// Tag identifying the producer of this record
    #[serde(default = "unknown_source")]
    pub source: String,
    /// Append time, ISO-8601 UTC
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Optional confidence score in `[0.0, 1.0]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

fn unknown_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

/// Caller-supplied input for an append
///
/// `source` defaults to [`DEFAULT_SOURCE`] when left unset; batch appends
/// override it with the batch-wide tag.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackDraft {
    /// Raw feedback content; must be non-empty
    pub text: String,
    /// Sentiment classification
    pub sentiment: Sentiment,
    /// Optional producer tag
    pub source: Option<String>,
    /// Optional confidence score in `[0.0, 1.0]`
    pub score: Option<f64>,
}

impl FeedbackDraft {
    /// Create a draft with the default source and no score
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            text: text.into(),
            sentiment,
            source: None,
            score: None,
        }
    }

    /// Override the producer tag
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach a confidence score
    #[inline]
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&score));
        self.score = Some(score);
        self
    }
}
