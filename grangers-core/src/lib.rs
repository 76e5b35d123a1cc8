//! Core value types for the grangers interval engine.
//!
//! Everything here follows one coordinate convention: positions are 1-based
//! and intervals are closed, so `[3, 5]` covers positions 3, 4 and 5 and has
//! width 3. Zero-width intervals are rejected at construction.
//!
//! ```rust
//! use grangers_core::models::{Interval, IntervalSet};
//!
//! let set = IntervalSet::from_pairs(&[(1, 4), (6, 9)]).unwrap();
//! assert_eq!(set.widths(), vec![4, 4]);
//! assert!(Interval::new(0, 3).is_err());
//! ```
pub mod errors;
pub mod models;
pub mod utils;

pub use self::errors::{Result, ValidationError};
