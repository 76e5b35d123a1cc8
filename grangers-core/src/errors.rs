use thiserror::Error;

///
/// Every failure the interval engine reports. All variants are validation
/// failures: malformed input is rejected synchronously and never retried.
///
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "Invalid interval{}: start={start}, end={end} ({reason})",
        .index.map(|i| format!(" at index {i}")).unwrap_or_default()
    )]
    InvalidInterval {
        index: Option<usize>,
        start: i64,
        end: i64,
        reason: &'static str,
    },

    #[error("Length mismatch for '{field}': expected {expected}, found {found}")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("Unknown overlap type: {0}")]
    UnknownOverlapType(String),

    #[error("Unknown strand symbol: {0}")]
    UnknownStrand(String),

    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Metadata schema mismatch in group '{group}': {message}")]
    SchemaMismatch { group: String, message: String },

    #[error("Invalid run-length encoding: {0}")]
    InvalidRuns(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ValidationError {
    /// Attach the offending row to an interval error raised without one.
    pub fn at_index(self, i: usize) -> Self {
        match self {
            ValidationError::InvalidInterval {
                index: None,
                start,
                end,
                reason,
            } => ValidationError::InvalidInterval {
                index: Some(i),
                start,
                end,
                reason,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;
