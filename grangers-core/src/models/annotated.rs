use crate::errors::{Result, ValidationError};
use crate::models::{
    GroupedIntervals, Interval, IntervalSet, MetaColumn, MetaValue, MetadataFrame, Rle, Strand,
};
use crate::utils::cmp_seqnames;

///
/// One raw record as handed over by a loader: sequence name, closed 1-based
/// coordinates and strand.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRecord {
    pub seqname: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
}

///
/// AnnotatedIntervalSet struct, an [IntervalSet] whose rows additionally carry
/// a sequence name, a strand and any number of metadata columns.
///
/// All parallel arrays always have the same length as the interval sequence.
/// Every row-selecting operation applies the same selection to all of them.
/// Sequence names and strands are stored run-length encoded, since sorted
/// genomic data repeats them heavily.
///
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedIntervalSet {
    ranges: IntervalSet,
    seqnames: Rle<String>,
    strands: Rle<Strand>,
    metadata: MetadataFrame,
}

/// Borrowed view of a single row.
#[derive(Debug, Clone, Copy)]
pub struct RangeRow<'a> {
    pub index: usize,
    pub seqname: &'a str,
    pub interval: Interval,
    pub strand: Strand,
    metadata: &'a MetadataFrame,
}

impl<'a> RangeRow<'a> {
    /// Value of metadata column `name` for this row.
    pub fn meta(&self, name: &str) -> Option<MetaValue<'a>> {
        self.metadata.column(name).and_then(|c| c.get(self.index))
    }
}

impl Default for AnnotatedIntervalSet {
    fn default() -> Self {
        AnnotatedIntervalSet {
            ranges: IntervalSet::empty(),
            seqnames: Rle::new(),
            strands: Rle::new(),
            metadata: MetadataFrame::empty(0),
        }
    }
}

impl TryFrom<Vec<RangeRecord>> for AnnotatedIntervalSet {
    type Error = ValidationError;

    fn try_from(value: Vec<RangeRecord>) -> Result<Self> {
        AnnotatedIntervalSet::from_records(value)
    }
}

impl AnnotatedIntervalSet {
    ///
    /// Create a new [AnnotatedIntervalSet] from parallel arrays.
    ///
    /// Fails with a length mismatch naming the first array whose length
    /// differs from `ranges`.
    ///
    pub fn new(
        ranges: IntervalSet,
        seqnames: Vec<String>,
        strands: Vec<Strand>,
        metadata: MetadataFrame,
    ) -> Result<Self> {
        let n = ranges.len();
        if seqnames.len() != n {
            return Err(ValidationError::LengthMismatch {
                field: "seqnames".to_string(),
                expected: n,
                found: seqnames.len(),
            });
        }
        if strands.len() != n {
            return Err(ValidationError::LengthMismatch {
                field: "strands".to_string(),
                expected: n,
                found: strands.len(),
            });
        }
        if metadata.n_rows() != n {
            return Err(ValidationError::LengthMismatch {
                field: "metadata".to_string(),
                expected: n,
                found: metadata.n_rows(),
            });
        }
        Ok(AnnotatedIntervalSet {
            ranges,
            seqnames: Rle::from_dense(&seqnames),
            strands: Rle::from_dense(&strands),
            metadata,
        })
    }

    ///
    /// Concatenate `(seqname, strand, ranges)` blocks into one set without
    /// metadata. Every range of a block takes the block's seqname and strand.
    ///
    pub fn from_blocks(blocks: Vec<(String, Strand, IntervalSet)>) -> Self {
        let mut intervals: Vec<Interval> = Vec::new();
        let mut seqnames: Vec<String> = Vec::new();
        let mut strands: Vec<Strand> = Vec::new();
        for (seqname, strand, ranges) in blocks {
            seqnames.extend(std::iter::repeat_n(seqname, ranges.len()));
            strands.extend(std::iter::repeat_n(strand, ranges.len()));
            intervals.extend(ranges.iter().copied());
        }
        let n = intervals.len();
        AnnotatedIntervalSet {
            ranges: IntervalSet::new(intervals),
            seqnames: Rle::from_dense(&seqnames),
            strands: Rle::from_dense(&strands),
            metadata: MetadataFrame::empty(n),
        }
    }

    ///
    /// Every range on one sequence, unstranded, without metadata.
    ///
    pub fn on_sequence(seqname: &str, ranges: IntervalSet) -> Self {
        let n = ranges.len();
        AnnotatedIntervalSet {
            seqnames: Rle::from_dense(&vec![seqname.to_string(); n]),
            strands: Rle::from_dense(&vec![Strand::Unstranded; n]),
            metadata: MetadataFrame::empty(n),
            ranges,
        }
    }

    ///
    /// Create a new [AnnotatedIntervalSet] from loader records. The first
    /// malformed record is reported with its index.
    ///
    pub fn from_records(records: Vec<RangeRecord>) -> Result<Self> {
        let n = records.len();
        let mut intervals = Vec::with_capacity(n);
        let mut seqnames = Vec::with_capacity(n);
        let mut strands = Vec::with_capacity(n);
        for (i, record) in records.into_iter().enumerate() {
            intervals.push(Interval::new(record.start, record.end).map_err(|e| e.at_index(i))?);
            seqnames.push(record.seqname);
            strands.push(record.strand);
        }
        AnnotatedIntervalSet::new(
            IntervalSet::new(intervals),
            seqnames,
            strands,
            MetadataFrame::empty(n),
        )
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &IntervalSet {
        &self.ranges
    }

    pub fn seqnames(&self) -> &Rle<String> {
        &self.seqnames
    }

    pub fn strands(&self) -> &Rle<Strand> {
        &self.strands
    }

    pub fn metadata(&self) -> &MetadataFrame {
        &self.metadata
    }

    pub fn seqname(&self, i: usize) -> Option<&str> {
        self.seqnames.get(i + 1).map(|s| s.as_str())
    }

    pub fn strand(&self, i: usize) -> Option<Strand> {
        self.strands.get(i + 1).copied()
    }

    pub fn row(&self, i: usize) -> Option<RangeRow<'_>> {
        Some(RangeRow {
            index: i,
            seqname: self.seqname(i)?,
            interval: *self.ranges.get(i)?,
            strand: self.strand(i)?,
            metadata: &self.metadata,
        })
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = RangeRow<'_>> {
        let seqnames = self.seqnames.runs().flat_map(|(s, l)| std::iter::repeat_n(s, l));
        let strands = self.strands.runs().flat_map(|(s, l)| std::iter::repeat_n(*s, l));
        self.ranges
            .iter()
            .zip(seqnames)
            .zip(strands)
            .enumerate()
            .map(|(index, ((interval, seqname), strand))| RangeRow {
                index,
                seqname: seqname.as_str(),
                interval: *interval,
                strand,
                metadata: &self.metadata,
            })
    }

    /// Sequence names in order of first appearance.
    pub fn seqlevels(&self) -> Vec<String> {
        let mut levels: Vec<String> = Vec::new();
        for (s, _) in self.seqnames.runs() {
            if !levels.contains(s) {
                levels.push(s.clone());
            }
        }
        levels
    }

    ///
    /// Select rows by index, in the given order, keeping every parallel array
    /// in lockstep.
    ///
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(ValidationError::IndexOutOfBounds {
                index: bad,
                len: self.len(),
            });
        }
        Ok(self.take_unchecked(indices))
    }

    /// [take](Self::take) for indices known to be in bounds.
    fn take_unchecked(&self, indices: &[usize]) -> Self {
        let seqnames_dense = self.seqnames.expand();
        let strands_dense = self.strands.expand();
        let seqnames: Vec<String> = indices.iter().map(|&i| seqnames_dense[i].clone()).collect();
        let strands: Vec<Strand> = indices.iter().map(|&i| strands_dense[i]).collect();
        AnnotatedIntervalSet {
            ranges: self.ranges.take_unchecked(indices),
            seqnames: Rle::from_dense(&seqnames),
            strands: Rle::from_dense(&strands),
            metadata: self.metadata.take_unchecked(indices),
        }
    }

    ///
    /// Keep the rows for which `keep` returns true, preserving order.
    ///
    pub fn filter<F>(&self, keep: F) -> Self
    where
        F: Fn(&RangeRow<'_>) -> bool,
    {
        let indices: Vec<usize> = self
            .rows()
            .filter(|row| keep(row))
            .map(|row| row.index)
            .collect();
        self.take_unchecked(&indices)
    }

    ///
    /// Keep the rows whose mask entry is true.
    ///
    pub fn filter_mask(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(ValidationError::LengthMismatch {
                field: "mask".to_string(),
                expected: self.len(),
                found: mask.len(),
            });
        }
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        self.take(&indices)
    }

    ///
    /// Row order sorting by sequence name (karyotypic), strand, start, end.
    /// Stable, so ties keep their input order.
    ///
    pub fn order(&self) -> Vec<usize> {
        let seqnames = self.seqnames.expand();
        let strands = self.strands.expand();
        let ranges = self.ranges.as_slice();
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            cmp_seqnames(&seqnames[a], &seqnames[b])
                .then_with(|| strands[a].cmp(&strands[b]))
                .then_with(|| ranges[a].cmp(&ranges[b]))
        });
        order
    }

    /// A sorted copy; `self` is left untouched.
    pub fn sorted(&self) -> Self {
        self.take_unchecked(&self.order())
    }

    ///
    /// Rows of `self` followed by rows of `other`. Metadata schemas must match.
    ///
    pub fn concat(&self, other: &AnnotatedIntervalSet) -> Result<Self> {
        let metadata = if self.is_empty() && self.metadata.n_columns() == 0 {
            other.metadata.clone()
        } else if other.is_empty() && other.metadata.n_columns() == 0 {
            self.metadata.clone()
        } else {
            self.metadata.concat(&other.metadata, "concat")?
        };
        let mut seqnames = self.seqnames.expand();
        seqnames.extend(other.seqnames.expand());
        let mut strands = self.strands.expand();
        strands.extend(other.strands.expand());
        AnnotatedIntervalSet::new(
            self.ranges.concat(&other.ranges),
            seqnames,
            strands,
            metadata,
        )
    }

    /// Copy with one more metadata column appended.
    pub fn with_column(&self, name: impl Into<String>, column: MetaColumn) -> Result<Self> {
        let mut out = self.clone();
        out.metadata = self.metadata.with_column(name, column)?;
        Ok(out)
    }

    /// Copy with the metadata replaced wholesale.
    pub fn with_metadata(&self, metadata: MetadataFrame) -> Result<Self> {
        if metadata.n_rows() != self.len() {
            return Err(ValidationError::LengthMismatch {
                field: "metadata".to_string(),
                expected: self.len(),
                found: metadata.n_rows(),
            });
        }
        let mut out = self.clone();
        out.metadata = metadata;
        Ok(out)
    }

    ///
    /// Copy with the intervals replaced row for row; seqnames, strands and
    /// metadata are kept.
    ///
    pub fn with_ranges(&self, ranges: IntervalSet) -> Result<Self> {
        if ranges.len() != self.len() {
            return Err(ValidationError::LengthMismatch {
                field: "ranges".to_string(),
                expected: self.len(),
                found: ranges.len(),
            });
        }
        let mut out = self.clone();
        out.ranges = ranges;
        Ok(out)
    }

    /// Same rows with all metadata columns dropped.
    pub fn without_metadata(&self) -> Self {
        let mut out = self.clone();
        out.metadata = MetadataFrame::empty(self.len());
        out
    }

    ///
    /// Split rows into one group per sequence name, in seqlevel order.
    ///
    pub fn split_by_seqname(&self) -> GroupedIntervals<AnnotatedIntervalSet> {
        let mut grouped = GroupedIntervals::new();
        let seqnames = self.seqnames.expand();
        for level in self.seqlevels() {
            let indices: Vec<usize> = seqnames
                .iter()
                .enumerate()
                .filter_map(|(i, s)| (*s == level).then_some(i))
                .collect();
            // levels are unique
            grouped.push_unique(level, self.take_unchecked(&indices));
        }
        grouped
    }
}
