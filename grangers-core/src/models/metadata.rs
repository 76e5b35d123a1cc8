use crate::errors::{Result, ValidationError};

/// One typed metadata column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaColumn {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
    Bool(Vec<bool>),
}

/// A single cell, borrowed from a [MetaColumn].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetaValue<'a> {
    Int(i64),
    Float(f64),
    Str(&'a str),
    Bool(bool),
}

impl MetaColumn {
    pub fn len(&self) -> usize {
        match self {
            MetaColumn::Int(v) => v.len(),
            MetaColumn::Float(v) => v.len(),
            MetaColumn::Str(v) => v.len(),
            MetaColumn::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            MetaColumn::Int(_) => "int",
            MetaColumn::Float(_) => "float",
            MetaColumn::Str(_) => "str",
            MetaColumn::Bool(_) => "bool",
        }
    }

    pub fn get(&self, i: usize) -> Option<MetaValue<'_>> {
        match self {
            MetaColumn::Int(v) => v.get(i).map(|x| MetaValue::Int(*x)),
            MetaColumn::Float(v) => v.get(i).map(|x| MetaValue::Float(*x)),
            MetaColumn::Str(v) => v.get(i).map(|x| MetaValue::Str(x.as_str())),
            MetaColumn::Bool(v) => v.get(i).map(|x| MetaValue::Bool(*x)),
        }
    }

    /// Caller guarantees every index is in bounds.
    fn take_unchecked(&self, indices: &[usize]) -> MetaColumn {
        match self {
            MetaColumn::Int(v) => MetaColumn::Int(indices.iter().map(|&i| v[i]).collect()),
            MetaColumn::Float(v) => MetaColumn::Float(indices.iter().map(|&i| v[i]).collect()),
            MetaColumn::Str(v) => MetaColumn::Str(indices.iter().map(|&i| v[i].clone()).collect()),
            MetaColumn::Bool(v) => MetaColumn::Bool(indices.iter().map(|&i| v[i]).collect()),
        }
    }

    /// Append `other`, which must hold the same type.
    fn append(&mut self, other: &MetaColumn) -> bool {
        match (self, other) {
            (MetaColumn::Int(a), MetaColumn::Int(b)) => a.extend_from_slice(b),
            (MetaColumn::Float(a), MetaColumn::Float(b)) => a.extend_from_slice(b),
            (MetaColumn::Str(a), MetaColumn::Str(b)) => a.extend_from_slice(b),
            (MetaColumn::Bool(a), MetaColumn::Bool(b)) => a.extend_from_slice(b),
            _ => return false,
        }
        true
    }
}

///
/// Ordered, named metadata columns sharing one row count.
///
/// A frame with no columns still carries a row count so that it can be
/// attached to an interval set of any length.
///
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMetadataFrame"))]
pub struct MetadataFrame {
    columns: Vec<(String, MetaColumn)>,
    n_rows: usize,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMetadataFrame {
    columns: Vec<(String, MetaColumn)>,
    n_rows: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMetadataFrame> for MetadataFrame {
    type Error = ValidationError;

    fn try_from(raw: RawMetadataFrame) -> Result<Self> {
        MetadataFrame::new(raw.n_rows, raw.columns)
    }
}

impl MetadataFrame {
    /// A frame with `n_rows` rows and no columns.
    pub fn empty(n_rows: usize) -> Self {
        MetadataFrame {
            columns: Vec::new(),
            n_rows,
        }
    }

    ///
    /// Build a frame from named columns. Names must be unique and every column
    /// must have `n_rows` entries.
    ///
    pub fn new(n_rows: usize, columns: Vec<(String, MetaColumn)>) -> Result<Self> {
        let mut frame = MetadataFrame::empty(n_rows);
        for (name, column) in columns {
            frame = frame.with_column(name, column)?;
        }
        Ok(frame)
    }

    ///
    /// Copy of the frame with one more column appended.
    ///
    pub fn with_column(&self, name: impl Into<String>, column: MetaColumn) -> Result<Self> {
        let name = name.into();
        if column.len() != self.n_rows {
            return Err(ValidationError::LengthMismatch {
                field: name,
                expected: self.n_rows,
                found: column.len(),
            });
        }
        if self.column(&name).is_some() {
            return Err(ValidationError::DuplicateKey(name));
        }
        let mut frame = self.clone();
        frame.columns.push((name, column));
        Ok(frame)
    }

    /// Copy of the frame with `column` placed before all existing columns.
    pub fn with_leading_column(&self, name: impl Into<String>, column: MetaColumn) -> Result<Self> {
        let appended = self.with_column(name, column)?;
        let mut columns = appended.columns;
        columns.rotate_right(1);
        Ok(MetadataFrame {
            columns,
            n_rows: self.n_rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&MetaColumn> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &MetaColumn)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    ///
    /// Select rows by index, in the given order, across every column.
    ///
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_rows) {
            return Err(ValidationError::IndexOutOfBounds {
                index: bad,
                len: self.n_rows,
            });
        }
        Ok(self.take_unchecked(indices))
    }

    /// [take](Self::take) for indices known to be in bounds.
    pub(crate) fn take_unchecked(&self, indices: &[usize]) -> Self {
        MetadataFrame {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.take_unchecked(indices)))
                .collect(),
            n_rows: indices.len(),
        }
    }

    /// Names and types of every column, in order.
    pub fn schema(&self) -> Vec<(&str, &'static str)> {
        self.columns
            .iter()
            .map(|(n, c)| (n.as_str(), c.type_name()))
            .collect()
    }

    ///
    /// Rows of `self` followed by rows of `other`. Both frames must share the
    /// same schema; `context` names the offending side in the error.
    ///
    pub fn concat(&self, other: &MetadataFrame, context: &str) -> Result<Self> {
        if self.schema() != other.schema() {
            return Err(ValidationError::SchemaMismatch {
                group: context.to_string(),
                message: format!("expected {:?}, found {:?}", self.schema(), other.schema()),
            });
        }
        let mut columns = self.columns.clone();
        for ((_, mine), (_, theirs)) in columns.iter_mut().zip(other.columns.iter()) {
            // schemas compared equal above
            mine.append(theirs);
        }
        Ok(MetadataFrame {
            columns,
            n_rows: self.n_rows + other.n_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn frame() -> MetadataFrame {
        MetadataFrame::new(
            3,
            vec![
                ("score".to_string(), MetaColumn::Float(vec![0.5, 1.5, 2.5])),
                (
                    "name".to_string(),
                    MetaColumn::Str(vec!["a".into(), "b".into(), "c".into()]),
                ),
            ],
        )
        .unwrap()
    }

    #[rstest]
    fn test_rejects_wrong_length(frame: MetadataFrame) {
        let err = frame
            .with_column("flag", MetaColumn::Bool(vec![true]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::LengthMismatch {
                field: "flag".to_string(),
                expected: 3,
                found: 1
            }
        );
    }

    #[rstest]
    fn test_rejects_duplicate(frame: MetadataFrame) {
        assert!(matches!(
            frame.with_column("score", MetaColumn::Int(vec![1, 2, 3])),
            Err(ValidationError::DuplicateKey(_))
        ));
    }

    #[rstest]
    fn test_take_keeps_columns_in_lockstep(frame: MetadataFrame) {
        let taken = frame.take(&[2, 0]).unwrap();
        assert_eq!(taken.n_rows(), 2);
        assert_eq!(taken.column("score").unwrap().get(0), Some(MetaValue::Float(2.5)));
        assert_eq!(taken.column("name").unwrap().get(1), Some(MetaValue::Str("a")));
        assert!(frame.take(&[3]).is_err());
    }

    #[rstest]
    fn test_leading_column(frame: MetadataFrame) {
        let f = frame
            .with_leading_column("group", MetaColumn::Int(vec![1, 1, 2]))
            .unwrap();
        assert_eq!(f.names(), vec!["group", "score", "name"]);
    }

    #[rstest]
    fn test_concat(frame: MetadataFrame) {
        let joined = frame.concat(&frame.take(&[1]).unwrap(), "g2").unwrap();
        assert_eq!(joined.n_rows(), 4);
        assert_eq!(joined.column("name").unwrap().get(3), Some(MetaValue::Str("b")));

        let other = MetadataFrame::empty(2);
        assert!(matches!(
            frame.concat(&other, "g2"),
            Err(ValidationError::SchemaMismatch { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn test_deserialize_checks_row_count() {
        let ok: MetadataFrame =
            serde_json::from_str(r#"{"columns":[["score",{"Int":[1,2]}]],"n_rows":2}"#).unwrap();
        assert_eq!(ok.n_rows(), 2);

        let short = serde_json::from_str::<MetadataFrame>(
            r#"{"columns":[["score",{"Int":[1,2]}]],"n_rows":3}"#,
        );
        assert!(short.is_err());
    }
}
