pub mod annotated;
pub mod grouped;
pub mod interval;
pub mod interval_set;
pub mod metadata;
pub mod rle;
pub mod strand;

// re-export for cleaner imports
pub use self::annotated::{AnnotatedIntervalSet, RangeRecord, RangeRow};
pub use self::grouped::{GroupMember, GroupedIntervals};
pub use self::interval::Interval;
pub use self::interval_set::IntervalSet;
pub use self::metadata::{MetaColumn, MetaValue, MetadataFrame};
pub use self::rle::Rle;
pub use self::strand::Strand;
