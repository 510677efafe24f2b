//! Lightweight value, record and column types.
//!
//! `Record` is the unit an operator sees; `RowBatch` is the columnar block a
//! host moves between stages. Both convert into each other losslessly.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::Schema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::I32(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

/// One pipeline tuple: an ordered, fixed-arity sequence of values.
///
/// Immutable once built. Field names live in the `Schema` the record is
/// read against, not in the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: Vec<Scalar>,
}

impl Record {
    pub fn new(values: Vec<Scalar>) -> Self {
        Self { values }
    }

    pub fn arity(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, idx: usize) -> Option<&Scalar> {
        self.values.get(idx)
    }

    /// Look up a field by name, using `schema` for the name → position mapping.
    pub fn get_named(&self, schema: &Schema, name: &str) -> Option<&Scalar> {
        schema.index_of(name).and_then(|idx| self.values.get(idx))
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Scalar> {
        self.values
    }
}

impl From<Vec<Scalar>> for Record {
    fn from(values: Vec<Scalar>) -> Self {
        Self::new(values)
    }
}

/// Build a `Record` from anything convertible into `Scalar`s.
#[macro_export]
macro_rules! record {
    ($($v:expr),* $(,)?) => {
        $crate::types::Record::new(vec![$($crate::types::Scalar::from($v)),*])
    };
}

/// Minimal column representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Minimal columnar block moved between stages by a host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl RowBatch {
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Column-major block → row records, in row order.
    ///
    /// Fails if the columns disagree on length.
    pub fn records(&self) -> Result<Vec<Record>> {
        let rows = self.num_rows();
        if let Some(bad) = self.columns.iter().find(|c| c.len() != rows) {
            return Err(Error::Invariant(format!(
                "column '{}' has {} rows, expected {}",
                bad.name,
                bad.len(),
                rows
            )));
        }
        Ok((0..rows)
            .map(|row_idx| {
                Record::new(
                    self.columns
                        .iter()
                        .map(|c| c.values[row_idx].clone())
                        .collect(),
                )
            })
            .collect())
    }

    /// Assemble records into columns named by `schema`.
    ///
    /// Every record must have the schema's arity.
    pub fn from_records(schema: &Schema, records: Vec<Record>) -> Result<RowBatch> {
        let mut columns: Vec<Column> = schema
            .fields
            .iter()
            .map(|f| Column {
                name: f.name.clone(),
                values: Vec::with_capacity(records.len()),
            })
            .collect();

        for (row_idx, record) in records.into_iter().enumerate() {
            if record.arity() != schema.arity() {
                return Err(Error::Schema(format!(
                    "record {} has arity {}, schema expects {}",
                    row_idx,
                    record.arity(),
                    schema.arity()
                )));
            }
            for (col, value) in columns.iter_mut().zip(record.into_values()) {
                col.values.push(value);
            }
        }

        Ok(RowBatch { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_named_access_goes_through_schema() {
        let schema = Schema::of_names(["id", "name"]);
        let r = record![7i64, "ada"];
        assert_eq!(r.arity(), 2);
        assert_eq!(r.get_named(&schema, "name"), Some(&Scalar::Str("ada".into())));
        assert_eq!(r.get_named(&schema, "missing"), None);
        assert_eq!(r.get(0), Some(&Scalar::I64(7)));
    }

    #[test]
    fn batch_records_roundtrip_keeps_row_order() {
        let schema = Schema::of_names(["a", "b"]);
        let rows = vec![record![1i64, "x"], record![2i64, "y"], record![3i64, "z"]];
        let batch = RowBatch::from_records(&schema, rows.clone()).unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.columns[1].name, "b");
        assert_eq!(batch.records().unwrap(), rows);
    }

    #[test]
    fn from_records_rejects_wrong_arity() {
        let schema = Schema::of_names(["a", "b"]);
        let err = RowBatch::from_records(&schema, vec![record![1i64]]).unwrap_err();
        assert!(err.to_string().contains("arity 1"));
    }

    #[test]
    fn ragged_batch_is_an_error() {
        let batch = RowBatch {
            columns: vec![
                Column {
                    name: "a".into(),
                    values: vec![Scalar::I64(1), Scalar::I64(2)],
                },
                Column {
                    name: "b".into(),
                    values: vec![Scalar::I64(1)],
                },
            ],
        };
        assert!(batch.records().is_err());
    }

    #[test]
    fn record_serializes_as_plain_array() {
        let json = serde_json::to_string(&record![1i64, true]).unwrap();
        assert_eq!(json, r#"[{"I64":1},{"Bool":true}]"#);
    }
}
