use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::ValidationError;

/// Strand of a genomic range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strand {
    /// `+`
    Forward,
    /// `-`
    Reverse,
    /// `*`, strand unknown or irrelevant
    #[default]
    Unstranded,
}

impl Strand {
    /// `*` is compatible with every strand; `+` and `-` only with themselves.
    pub fn compatible(&self, other: &Strand) -> bool {
        matches!(self, Strand::Unstranded) || matches!(other, Strand::Unstranded) || self == other
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unstranded => '*',
        }
    }
}

impl FromStr for Strand {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "*" | "." => Ok(Strand::Unstranded),
            other => Err(ValidationError::UnknownStrand(other.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
