//! # Input/Output for grangers.
//!
//! Reading BED files into [AnnotatedIntervalSet](grangers_core::models::AnnotatedIntervalSet)s
//! and writing them back, plus bedGraph export of coverage vectors. BED
//! coordinates are 0-based half-open on disk and 1-based closed in memory;
//! conversion happens here and nowhere else. Files ending in `.gz` are
//! transparently (de)compressed.
//!
pub mod bed;
pub mod bedgraph;
pub mod chrom_sizes;
pub mod consts;
pub mod error;

// re-expose core functions
pub use bed::*;
pub use bedgraph::*;
pub use chrom_sizes::*;
pub use consts::*;
pub use error::*;
