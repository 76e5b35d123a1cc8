//! Interval algebra for grangers.
//!
//! Three traits cover the three container types from `grangers-core`:
//!
//! - [`IntervalRanges`] for plain [`IntervalSet`](grangers_core::models::IntervalSet)s
//!   (reduce, disjoin, gaps, set operations, shift/flank/promoters/resize)
//! - [`GenomicRanges`] for annotated sets, strand-aware per sequence
//! - [`GroupedRanges`] for grouped collections, applied group-wise
//!
//! ```rust
//! use grangers_core::models::IntervalSet;
//! use grangers_ranges::IntervalRanges;
//!
//! let set = IntervalSet::from_pairs(&[(1, 5), (4, 8), (10, 12)]).unwrap();
//! assert_eq!(set.reduce(), IntervalSet::from_pairs(&[(1, 8), (10, 12)]).unwrap());
//! ```
pub mod genomic_ranges;
pub mod grouped_ranges;
pub mod interval_ranges;

// re-exports
pub use self::genomic_ranges::GenomicRanges;
pub use self::grouped_ranges::GroupedRanges;
pub use self::interval_ranges::{Fix, IntervalRanges};
