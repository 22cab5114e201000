//! # vox-insights
//!
//! Read-only aggregation over [`vox_store`] snapshots for the VOX
//! sentiment dashboard: per-sentiment counts, the proportional breakdown
//! that drives the pie chart, and the tabular projection behind the
//! feedback table.
//!
//! All summaries are pure functions of one captured [`Snapshot`]; the
//! aggregator never mutates the store.
//!
//! ## Example
//! ```no_run
//! use vox_insights::Snapshot;
//! use vox_store::FeedbackStore;
//!
//! let store = FeedbackStore::open("feedback_data.json");
//! let snapshot = Snapshot::capture(&store)?;
//! let counts = snapshot.counts();
//! assert_eq!(
//!     counts.positive + counts.negative + counts.neutral,
//!     counts.total
//! );
//! # Ok::<(), vox_store::StoreError>(())
//! ```

pub mod snapshot;

pub use snapshot::{SentimentCounts, Snapshot, TableRow, NO_DATA_BUCKET};
