use std::fmt::Display;
use std::io::Write;

use grangers_core::models::Rle;

use crate::error::Result;

///
/// Write one coverage vector as bedGraph lines, one line per run.
///
/// Run positions are 1-based closed in the [Rle] and written 0-based
/// half-open. Zero runs are written too, so the output covers the whole
/// vector.
///
/// # Arguments
/// - seqname: sequence name for the first column
/// - rle: the vector to write
/// - writer: the destination
///
pub fn write_rle_bedgraph<V, W>(seqname: &str, rle: &Rle<V>, writer: &mut W) -> Result<()>
where
    V: PartialEq + Clone + Display,
    W: Write,
{
    let mut start: usize = 0;
    for (value, length) in rle.runs() {
        let end = start + length;
        writeln!(writer, "{}\t{}\t{}\t{}", seqname, start, end, value)?;
        start = end;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_runs_become_lines() {
        let rle = Rle::from_dense(&[0u32, 1, 2, 2, 1, 1]);
        let mut out: Vec<u8> = Vec::new();
        write_rle_bedgraph("chr1", &rle, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "chr1\t0\t1\t0\nchr1\t1\t2\t1\nchr1\t2\t4\t2\nchr1\t4\t6\t1\n"
        );
    }

    #[rstest]
    fn test_empty_rle_writes_nothing() {
        let rle: Rle<i64> = Rle::new();
        let mut out: Vec<u8> = Vec::new();
        write_rle_bedgraph("chr1", &rle, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
