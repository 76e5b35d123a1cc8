//! Sequence-aware overlap queries for annotated interval sets.
//!
//! [`MultiSeqOverlapper`] keeps one interval index per sequence name, so a
//! query row is only ever compared with subject rows on the same sequence.
//!
//! # Examples
//!
//! ```
//! use grangers_core::models::{AnnotatedIntervalSet, IntervalSet};
//! use grangers_overlaprs::{OverlapOptions, find_overlaps_annotated};
//!
//! let genes = AnnotatedIntervalSet::on_sequence("chr1", IntervalSet::from_pairs(&[(100, 200)]).unwrap());
//! let peaks = AnnotatedIntervalSet::on_sequence("chr2", IntervalSet::from_pairs(&[(150, 160)]).unwrap());
//!
//! // same coordinates, different sequences
//! let hits = find_overlaps_annotated(&peaks, &genes, &OverlapOptions::default(), false).unwrap();
//! assert!(hits.is_empty());
//! ```

use fxhash::FxHashMap;

use grangers_core::errors::Result;
use grangers_core::models::{AnnotatedIntervalSet, Strand};

use crate::OverlapperType;
use crate::hits::Hits;
use crate::overlaps::{OverlapOptions, build_overlapper, subjects_for};
use crate::traits::{Entry, Overlapper};

///
/// One interval index per sequence name, built over the rows of an
/// [`AnnotatedIntervalSet`]. Index entries carry the subject row index.
///
pub struct MultiSeqOverlapper {
    index_maps: FxHashMap<String, Box<dyn Overlapper<u32, usize>>>,
    strands: Vec<Strand>,
    subject_len: usize,
}

impl MultiSeqOverlapper {
    pub fn build(subject: &AnnotatedIntervalSet, overlapper_type: OverlapperType) -> Self {
        // STEP 1: organize rows into one entry vector per sequence
        let mut entries: FxHashMap<String, Vec<Entry<u32, usize>>> = FxHashMap::default();
        for row in subject.rows() {
            entries
                .entry(row.seqname.to_string())
                .or_default()
                .push(Entry {
                    start: row.interval.start(),
                    end: row.interval.end(),
                    val: row.index,
                });
        }

        // STEP 2: build one index per sequence
        let index_maps = entries
            .into_iter()
            .map(|(seqname, seq_entries)| (seqname, build_overlapper(seq_entries, overlapper_type)))
            .collect();

        MultiSeqOverlapper {
            index_maps,
            strands: subject.strands().expand(),
            subject_len: subject.len(),
        }
    }

    /// Indexed sequence names, in no particular order.
    pub fn seqnames(&self) -> Vec<&str> {
        self.index_maps.keys().map(|s| s.as_str()).collect()
    }

    pub fn get(&self, seqname: &str) -> Option<&dyn Overlapper<u32, usize>> {
        self.index_maps.get(seqname).map(|b| b.as_ref())
    }

    ///
    /// Overlaps of every `query` row with the indexed subject. Sequence names
    /// must match; strands must be compatible unless `ignore_strand`.
    ///
    pub fn find_overlaps(
        &self,
        query: &AnnotatedIntervalSet,
        options: &OverlapOptions,
        ignore_strand: bool,
    ) -> Result<Hits> {
        options.validate()?;
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for row in query.rows() {
            let Some(index) = self.get(row.seqname) else {
                continue;
            };
            let keep = |j: usize| ignore_strand || row.strand.compatible(&self.strands[j]);
            for j in subjects_for(index, &row.interval, options, keep) {
                pairs.push((row.index, j));
            }
        }
        Ok(Hits::from_sorted(pairs, query.len(), self.subject_len))
    }
}

///
/// Overlaps between two annotated sets: sequence names must match and
/// strands must be compatible (`*` matches anything) unless `ignore_strand`.
///
pub fn find_overlaps_annotated(
    query: &AnnotatedIntervalSet,
    subject: &AnnotatedIntervalSet,
    options: &OverlapOptions,
    ignore_strand: bool,
) -> Result<Hits> {
    MultiSeqOverlapper::build(subject, options.index).find_overlaps(query, options, ignore_strand)
}

/// [`find_overlaps_annotated`] reduced to one count per query row.
pub fn count_overlaps_annotated(
    query: &AnnotatedIntervalSet,
    subject: &AnnotatedIntervalSet,
    options: &OverlapOptions,
    ignore_strand: bool,
) -> Result<Vec<usize>> {
    Ok(find_overlaps_annotated(query, subject, options, ignore_strand)?.count_per_query())
}

/// Query rows with at least one hit, every parallel array kept.
pub fn subset_by_overlaps_annotated(
    query: &AnnotatedIntervalSet,
    subject: &AnnotatedIntervalSet,
    options: &OverlapOptions,
    ignore_strand: bool,
) -> Result<AnnotatedIntervalSet> {
    let counts = count_overlaps_annotated(query, subject, options, ignore_strand)?;
    let mask: Vec<bool> = counts.iter().map(|&c| c > 0).collect();
    query.filter_mask(&mask)
}
