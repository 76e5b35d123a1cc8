use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use grangers_core::models::{AnnotatedIntervalSet, MetaColumn, MetaValue, RangeRecord, Strand};

use crate::consts::{GZ_EXTENSION, MISSING_FIELD, NAME_COLUMN, SCORE_COLUMN};
use crate::error::{IoError, Result};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new(GZ_EXTENSION));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
}

/// A header line carries words where both coordinates would be.
fn is_header(parts: &[&str]) -> bool {
    parts.len() >= 3 && parts[1].parse::<i64>().is_err() && parts[2].parse::<i64>().is_err()
}

fn parse_coordinate(field: &str, what: &str, line: usize) -> Result<u32> {
    field.parse::<u32>().map_err(|_| IoError::Parse {
        line,
        message: format!("invalid {what} coordinate '{field}'"),
    })
}

///
/// Parse BED records from any buffered reader.
///
/// Comment lines (`#`, `track`, `browser`), blank lines and a leading
/// column-header line are skipped. Every record needs at least three
/// columns; the 0-based half-open `[start, end)` becomes the 1-based closed
/// `[start + 1, end]`. Column 4 becomes the `name` metadata column, column 5
/// the `score` column when every record carries a numeric score, and column
/// 6 the strand.
///
/// An input without records yields an empty set.
///
pub fn parse_bed<R: BufRead>(reader: R) -> Result<AnnotatedIntervalSet> {
    let mut records: Vec<RangeRecord> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut scores: Vec<Option<f64>> = Vec::new();
    let mut has_names = false;
    let mut has_scores = false;
    let mut first_line = true;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = i + 1;
        let line = line.trim_end_matches('\r');

        if line.trim().is_empty() || is_comment(line) {
            continue;
        }

        let parts: Vec<&str> = line.split('\t').collect();

        // Handling column headers like `chr start end etc` without #
        if first_line {
            first_line = false;
            if is_header(&parts) {
                continue;
            }
        }

        if parts.len() < 3 {
            return Err(IoError::Parse {
                line: line_number,
                message: format!("expected at least 3 columns, found {}", parts.len()),
            });
        }

        let start = parse_coordinate(parts[1], "start", line_number)?;
        let end = parse_coordinate(parts[2], "end", line_number)?;
        if end <= start {
            return Err(IoError::Parse {
                line: line_number,
                message: format!("empty or inverted interval [{start}, {end})"),
            });
        }

        let strand = match parts.get(5) {
            Some(s) => Strand::from_str(s).map_err(|e| IoError::Parse {
                line: line_number,
                message: e.to_string(),
            })?,
            None => Strand::Unstranded,
        };

        has_names |= parts.len() > 3;
        has_scores |= parts.len() > 4;
        names.push(parts.get(3).unwrap_or(&MISSING_FIELD).to_string());
        scores.push(parts.get(4).and_then(|s| s.parse::<f64>().ok()));

        records.push(RangeRecord {
            seqname: parts[0].to_string(),
            start: start + 1,
            end,
            strand,
        });
    }

    let mut set = AnnotatedIntervalSet::from_records(records)?;

    if has_names {
        set = set.with_column(NAME_COLUMN, MetaColumn::Str(names))?;
    }
    if has_scores {
        match scores.into_iter().collect::<Option<Vec<f64>>>() {
            Some(scores) => set = set.with_column(SCORE_COLUMN, MetaColumn::Float(scores))?,
            None => log::warn!("score column is missing or non-numeric on some records, dropping it"),
        }
    }

    log::debug!("parsed {} BED records", set.len());
    Ok(set)
}

///
/// Read a BED file, gzip'd when the path ends in `.gz`.
///
/// # Arguments
///
/// - path: the path to the file to read
///
pub fn read_bed<P: AsRef<Path>>(path: P) -> Result<AnnotatedIntervalSet> {
    let path = path.as_ref();
    let set = parse_bed(get_dynamic_reader(path)?)?;
    log::info!("read {} ranges from {}", set.len(), path.display());
    Ok(set)
}

fn format_score(value: Option<MetaValue<'_>>) -> String {
    match value {
        Some(MetaValue::Float(f)) => f.to_string(),
        Some(MetaValue::Int(i)) => i.to_string(),
        _ => "0".to_string(),
    }
}

///
/// Write `set` as BED to any writer.
///
/// Three columns are written unless the set carries a `name` or `score`
/// column or any stranded row, in which case all six are written, with
/// placeholders for missing fields.
///
pub fn write_bed_to<W: Write>(set: &AnnotatedIntervalSet, writer: &mut W) -> Result<()> {
    let metadata = set.metadata();
    let six_columns = metadata.column(NAME_COLUMN).is_some()
        || metadata.column(SCORE_COLUMN).is_some()
        || set.strands().values().iter().any(|s| *s != Strand::Unstranded);

    for row in set.rows() {
        let start = row.interval.start() - 1;
        let end = row.interval.end();
        if !six_columns {
            writeln!(writer, "{}\t{}\t{}", row.seqname, start, end)?;
            continue;
        }
        let name = match row.meta(NAME_COLUMN) {
            Some(MetaValue::Str(s)) => s,
            _ => MISSING_FIELD,
        };
        let strand = match row.strand {
            Strand::Unstranded => '.',
            other => other.as_char(),
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.seqname,
            start,
            end,
            name,
            format_score(row.meta(SCORE_COLUMN)),
            strand
        )?;
    }
    Ok(())
}

pub trait BedWrite {
    ///
    /// Write data to disk as bed file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_bed<T: AsRef<Path>>(&self, path: T) -> Result<()>;

    ///
    /// Write data to disk as bed.gz file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_bed_gz<T: AsRef<Path>>(&self, path: T) -> Result<()>;
}

impl BedWrite for AnnotatedIntervalSet {
    fn write_bed<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        write_bed_to(self, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_bed_gz<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
        write_bed_to(self, &mut encoder)?;

        encoder.finish()?.flush()?;
        Ok(())
    }
}
