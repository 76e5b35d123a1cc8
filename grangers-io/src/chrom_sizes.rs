use std::io::BufRead;
use std::path::Path;

use fxhash::FxHashMap;

use crate::bed::get_dynamic_reader;
use crate::error::{IoError, Result};

///
/// Parse a chrom.sizes listing: one `seqname length` pair per line,
/// whitespace separated. Blank and `#` lines are skipped.
///
pub fn parse_chrom_sizes<R: BufRead>(reader: R) -> Result<FxHashMap<String, u32>> {
    let mut chrom_sizes: FxHashMap<String, u32> = FxHashMap::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (Some(seqname), Some(length)) = (parts.next(), parts.next()) else {
            return Err(IoError::Parse {
                line: i + 1,
                message: "expected a sequence name and a length".to_string(),
            });
        };
        let length = length.parse::<u32>().map_err(|_| IoError::Parse {
            line: i + 1,
            message: format!("invalid sequence length '{length}'"),
        })?;

        chrom_sizes.insert(seqname.to_string(), length);
    }

    Ok(chrom_sizes)
}

/// Read a chrom.sizes file, gzip'd when the path ends in `.gz`.
pub fn read_chrom_sizes<P: AsRef<Path>>(path: P) -> Result<FxHashMap<String, u32>> {
    parse_chrom_sizes(get_dynamic_reader(path.as_ref())?)
}
