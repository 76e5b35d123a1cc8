//! Overlap queries between genomic interval sets.
//!
//! Two interval indexes answer "which entries share a position with
//! `[start, end]`" in closed 1-based coordinates:
//!
//! - [`AIList`]: Augmented Interval List, suited to dense, high-coverage data
//! - [`Bits`]: Binary Interval Search, with allocation-free counting
//!
//! On top of them, [`find_overlaps`] relates every query interval to the
//! subject intervals under an [`OverlapType`] predicate and returns [`Hits`],
//! ordered by query index then subject index. Counts, selections and
//! subsetting are all derived from those hits.
//!
//! ## Quick Start
//!
//! ```rust
//! use grangers_core::models::IntervalSet;
//! use grangers_overlaprs::{OverlapOptions, OverlapType, count_overlaps, find_overlaps};
//!
//! let query = IntervalSet::from_start_width(&[(1, 2), (5, 2), (3, 4), (4, 6)]).unwrap();
//! let subject = IntervalSet::from_pairs(&[(1, 4), (3, 6), (5, 9), (6, 9)]).unwrap();
//!
//! let starts = find_overlaps(&query, &subject, &OverlapOptions::new(OverlapType::Start)).unwrap();
//! assert_eq!(starts.to_pairs(), vec![(0, 0), (1, 2), (2, 1)]);
//!
//! let counts = count_overlaps(&query, &subject, &OverlapOptions::default()).unwrap();
//! assert_eq!(counts, vec![1, 3, 4, 4]);
//! ```

/// Augmented Interval List implementation.
///
/// See [`AIList`] for details.
pub mod ailist;

/// Binary Interval Search implementation.
///
/// See [`Bits`] for details.
pub mod bits;

/// Query/subject hit pairs.
pub mod hits;

/// Per-sequence indexing for annotated interval sets.
pub mod multi_seq_overlapper;

/// Overlap predicates and queries.
pub mod overlaps;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

// re-exports
pub use self::ailist::AIList;
pub use self::bits::Bits;
pub use self::hits::{Hits, Select};
pub use self::multi_seq_overlapper::{
    MultiSeqOverlapper, count_overlaps_annotated, find_overlaps_annotated,
    subset_by_overlaps_annotated,
};
pub use self::overlaps::{
    OverlapOptions, OverlapType, build_index, build_overlapper, count_overlaps, find_overlaps,
    find_overlaps_grouped, subset_by_overlaps,
};
pub use self::traits::{Entry, Overlapper};

/// The type of overlap data structure to use.
///
/// * `AIList` - best for data with high-coverage regions (dense annotations,
///   ChIP-seq peaks)
/// * `Bits` - best for general-purpose queries
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapperType {
    #[default]
    AIList,
    Bits,
}

impl std::str::FromStr for OverlapperType {
    type Err = grangers_core::errors::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ailist" => Ok(OverlapperType::AIList),
            "bits" => Ok(OverlapperType::Bits),
            other => Err(grangers_core::errors::ValidationError::InvalidArgument(format!(
                "unknown index type: {other}"
            ))),
        }
    }
}
