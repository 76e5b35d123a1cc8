//! Genomic interval algebra.
//!
//! This crate bundles the grangers crates behind cargo features:
//!
//! - `core`: intervals, interval sets, run-length vectors, annotated and grouped sets
//! - `ranges`: reduce, disjoin, gaps, set operations and friends
//! - `overlaprs`: overlap queries and hit matrices
//! - `coverage`: per-position depth as run-length vectors
//! - `io`: BED and bedGraph input/output
//!
//! ```rust
//! use grangers::core::models::IntervalSet;
//! use grangers::coverage::coverage;
//! use grangers::ranges::IntervalRanges;
//!
//! let set = IntervalSet::from_pairs(&[(1, 3), (2, 5), (10, 12)]).unwrap();
//! let merged = set.reduce();
//! assert_eq!(coverage(&merged, None).sum(), merged.total_width());
//! ```
#[cfg(feature = "core")]
#[doc(inline)]
pub use grangers_core as core;

#[cfg(feature = "ranges")]
#[doc(inline)]
pub use grangers_ranges as ranges;

#[cfg(feature = "overlaprs")]
#[doc(inline)]
pub use grangers_overlaprs as overlaprs;

#[cfg(feature = "coverage")]
#[doc(inline)]
pub use grangers_coverage as coverage;

#[cfg(feature = "io")]
#[doc(inline)]
pub use grangers_io as io;
