//! # vox-store
//!
//! Durable persistence for customer-feedback records, backing the VOX
//! sentiment dashboard.
//!
//! The store keeps every record in a single JSON container file and
//! guarantees two things across crashes and concurrent use:
//!
//! - **Atomic replace**: every commit writes the full container to a temp
//!   file and renames it over the original, so no reader ever observes a
//!   half-written file.
//! - **Self-healing initialization**: a missing file is created, a legacy
//!   bare-array file is normalized, and a corrupt file is quarantined to a
//!   `.corrupt` sibling and replaced with an empty container.
//!
//! Mutations are serialized by an internal mutex; two appends never lose
//! each other's update within one process. The design trades O(n) rewrite
//! cost per append for simplicity, which is the right trade at dashboard
//! scale.
//!
//! ## Example
//! ```no_run
//! use vox_store::{FeedbackDraft, FeedbackStore, Sentiment};
//!
//! let store = FeedbackStore::open("feedback_data.json");
//! let record = store.append(FeedbackDraft::new("Great service!", Sentiment::Positive))?;
//! assert_eq!(record.source, "analysis");
//! # Ok::<(), vox_store::StoreError>(())
//! ```

pub mod error;
pub mod record;
pub mod store;

pub use error::StoreError;
pub use record::{
    FeedbackDraft, FeedbackRecord, Sentiment, DEFAULT_BATCH_SOURCE, DEFAULT_SOURCE,
};
pub use store::{FeedbackStore, DEFAULT_STORE_FILE};
