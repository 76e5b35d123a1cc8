use std::fmt::{self, Display};

use crate::errors::{Result, ValidationError};

///
/// A closed, 1-based range `[start, end]`.
///
/// Both ends are inclusive, so `width = end - start + 1` and the smallest
/// interval is a single position (`start == end`). Zero-width intervals are
/// not representable.
///
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawInterval"))]
pub struct Interval {
    start: u32,
    end: u32,
}

/// Unchecked wire shape, validated through [Interval::new].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawInterval {
    start: u32,
    end: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawInterval> for Interval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    ///
    /// Create a new interval, rejecting `start == 0` and `start > end`.
    ///
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start == 0 {
            return Err(ValidationError::InvalidInterval {
                index: None,
                start: start as i64,
                end: end as i64,
                reason: "coordinates are 1-based",
            });
        }
        if start > end {
            return Err(ValidationError::InvalidInterval {
                index: None,
                start: start as i64,
                end: end as i64,
                reason: "start > end",
            });
        }
        Ok(Interval { start, end })
    }

    ///
    /// Create an interval from its start and width.
    ///
    pub fn from_width(start: u32, width: u32) -> Result<Self> {
        if width == 0 {
            return Err(ValidationError::InvalidInterval {
                index: None,
                start: start as i64,
                end: start as i64 - 1,
                reason: "zero width",
            });
        }
        let end = start
            .checked_add(width - 1)
            .ok_or(ValidationError::InvalidInterval {
                index: None,
                start: start as i64,
                end: start as i64 + width as i64 - 1,
                reason: "end overflows u32",
            })?;
        Interval::new(start, end)
    }

    ///
    /// Build from coordinates already known to satisfy `1 <= start <= end`,
    /// e.g. values derived from other valid intervals. Checked in debug builds only.
    ///
    pub fn new_unchecked(start: u32, end: u32) -> Self {
        debug_assert!(start >= 1 && start <= end);
        Interval { start, end }
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.end
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Left-of-centre midpoint for even widths.
    #[inline]
    pub fn mid(&self) -> u32 {
        self.start + (self.width() - 1) / 2
    }

    /// Check if two intervals share at least one position
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Number of positions shared by both intervals
    #[inline]
    pub fn overlap_width(&self, other: &Interval) -> u32 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start > end { 0 } else { end - start + 1 }
    }

    /// `other` lies entirely inside `self`
    #[inline]
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    ///
    /// Number of uncovered positions separating two intervals, `None` if
    /// they overlap. Adjacent intervals have a gap of zero.
    ///
    pub fn gap_to(&self, other: &Interval) -> Option<u32> {
        if self.overlaps(other) {
            None
        } else if self.end < other.start {
            Some(other.start - self.end - 1)
        } else {
            Some(self.start - other.end - 1)
        }
    }

    /// The intervals touch without sharing a position (`a.end + 1 == b.start`).
    pub fn is_adjacent(&self, other: &Interval) -> bool {
        self.gap_to(other) == Some(0)
    }
}

impl TryFrom<(u32, u32)> for Interval {
    type Error = ValidationError;

    fn try_from(value: (u32, u32)) -> Result<Self> {
        Interval::new(value.0, value.1)
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_width_is_inclusive() {
        let iv = Interval::new(1, 5).unwrap();
        assert_eq!(iv.width(), 5);
        assert_eq!(Interval::new(7, 7).unwrap().width(), 1);
    }

    #[rstest]
    #[case(1, 5, 3)]
    #[case(1, 4, 2)]
    #[case(10, 10, 10)]
    fn test_mid(#[case] start: u32, #[case] end: u32, #[case] expected: u32) {
        assert_eq!(Interval::new(start, end).unwrap().mid(), expected);
    }

    #[rstest]
    fn test_rejects_reversed_and_zero_start() {
        assert!(matches!(
            Interval::new(5, 4),
            Err(ValidationError::InvalidInterval {
                reason: "start > end",
                ..
            })
        ));
        assert!(Interval::new(0, 4).is_err());
        assert!(Interval::from_width(3, 0).is_err());
    }

    #[rstest]
    fn test_from_width() {
        let iv = Interval::from_width(4, 6).unwrap();
        assert_eq!((iv.start(), iv.end()), (4, 9));
        assert!(Interval::from_width(u32::MAX, 2).is_err());
    }

    #[rstest]
    fn test_overlap_and_adjacency_boundaries() {
        let a = Interval::new(1, 5).unwrap();
        let touching = Interval::new(6, 8).unwrap();
        let sharing = Interval::new(5, 8).unwrap();
        let apart = Interval::new(7, 8).unwrap();

        assert!(!a.overlaps(&touching));
        assert!(a.is_adjacent(&touching));
        assert!(touching.is_adjacent(&a));

        assert!(a.overlaps(&sharing));
        assert_eq!(a.overlap_width(&sharing), 1);
        assert_eq!(a.gap_to(&sharing), None);

        assert_eq!(a.gap_to(&apart), Some(1));
        assert_eq!(apart.gap_to(&a), Some(1));
        assert!(!a.is_adjacent(&apart));
    }

    #[rstest]
    fn test_contains_and_order() {
        let outer = Interval::new(1, 10).unwrap();
        let inner = Interval::new(3, 4).unwrap();
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));

        let mut ivs = vec![
            Interval::new(3, 9).unwrap(),
            Interval::new(1, 4).unwrap(),
            Interval::new(3, 5).unwrap(),
        ];
        ivs.sort();
        assert_eq!(ivs[0].to_string(), "1-4");
        assert_eq!(ivs[1].to_string(), "3-5");
    }

    #[cfg(feature = "serde")]
    #[rstest]
    #[case(r#"{"start":9,"end":2}"#)]
    #[case(r#"{"start":0,"end":2}"#)]
    fn test_deserialize_rejects_invalid(#[case] json: &str) {
        assert!(serde_json::from_str::<Interval>(json).is_err());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn test_deserialize_validated() {
        let iv: Interval = serde_json::from_str(r#"{"start":2,"end":9}"#).unwrap();
        assert_eq!(iv, Interval::new(2, 9).unwrap());
        assert_eq!(iv.width(), 8);

        let set = serde_json::from_str::<crate::models::IntervalSet>(
            r#"{"intervals":[{"start":1,"end":3},{"start":9,"end":2}]}"#,
        );
        assert!(set.is_err());
    }
}
