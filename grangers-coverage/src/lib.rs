//! Coverage for grangers.
//!
//! The coverage of an interval set is the number of intervals covering
//! every position of a 1-based coordinate space, stored as an
//! [`Rle`](grangers_core::models::Rle) so long stretches of equal depth
//! cost a single run.
//!
//! ```rust
//! use grangers_core::models::IntervalSet;
//! use grangers_coverage::coverage;
//!
//! let set = IntervalSet::from_pairs(&[(1, 3), (2, 5)]).unwrap();
//! let depth = coverage(&set, None);
//! assert_eq!(depth.values(), &[1, 2, 1]);
//! assert_eq!(depth.lengths(), &[1, 2, 2]);
//! ```
pub mod coverage;

pub use self::coverage::{Coverage, coverage, weighted_coverage};
