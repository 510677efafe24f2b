//! Conversion between pipeline records and runtime values.
//!
//! `Coercer` is the whole contract: records go in as an argument list, and
//! each result element comes back as one record of the output schema's
//! arity. Field types are not checked against the schema.

use mapcat_core::prelude::{Record, Scalar, Schema};
use thiserror::Error;

use crate::dynamic::{RuntimeError, Value};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("expected {expected} fields, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("expected a collection, got {0}")]
    NotACollection(&'static str),

    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("field {index}: cannot store a {type_name} in a record")]
    Unsupported {
        index: usize,
        type_name: &'static str,
    },

    #[error("producing element failed: {0}")]
    Runtime(#[from] RuntimeError),
}

pub trait Coercer: Send + Sync {
    /// Record → positional argument list.
    fn to_args(&self, record: &Record) -> Result<Vec<Value>, CoerceError>;

    /// One result element → one record shaped like `schema`.
    fn to_record(&self, element: Value, schema: &Schema) -> Result<Record, CoerceError>;
}

/// Default coercion.
///
/// Elements may be lists or lazy sequences (read positionally) or maps
/// (read by the schema's field names, string keys).
#[derive(Debug, Clone, Copy, Default)]
pub struct SeqCoercer;

impl Coercer for SeqCoercer {
    fn to_args(&self, record: &Record) -> Result<Vec<Value>, CoerceError> {
        Ok(record.values().iter().map(scalar_to_value).collect())
    }

    fn to_record(&self, element: Value, schema: &Schema) -> Result<Record, CoerceError> {
        let expected = schema.arity();
        let fields = match element {
            Value::List(items) => items,
            Value::Lazy(lazy) => lazy.collect::<Result<Vec<_>, _>>()?,
            Value::Map(entries) => return map_to_record(entries, schema),
            other => return Err(CoerceError::NotACollection(other.type_name())),
        };

        if fields.len() != expected {
            return Err(CoerceError::Arity {
                expected,
                actual: fields.len(),
            });
        }

        fields
            .into_iter()
            .enumerate()
            .map(|(index, v)| value_to_scalar(index, v))
            .collect::<Result<Vec<_>, _>>()
            .map(Record::new)
    }
}

fn map_to_record(mut entries: Vec<(Value, Value)>, schema: &Schema) -> Result<Record, CoerceError> {
    if entries.len() != schema.arity() {
        return Err(CoerceError::Arity {
            expected: schema.arity(),
            actual: entries.len(),
        });
    }

    let mut values = Vec::with_capacity(schema.arity());
    for (index, name) in schema.names().enumerate() {
        let pos = entries
            .iter()
            .position(|(k, _)| matches!(k, Value::Str(s) if s == name))
            .ok_or_else(|| CoerceError::MissingField(name.to_string()))?;
        let (_, v) = entries.swap_remove(pos);
        values.push(value_to_scalar(index, v)?);
    }
    Ok(Record::new(values))
}

pub fn scalar_to_value(s: &Scalar) -> Value {
    match s {
        Scalar::Null => Value::Nil,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::I32(i) => Value::Int(i64::from(*i)),
        Scalar::I64(i) => Value::Int(*i),
        Scalar::F32(f) => Value::Float(f64::from(*f)),
        Scalar::F64(f) => Value::Float(*f),
        Scalar::Str(s) => Value::Str(s.clone()),
        Scalar::Bin(b) => Value::Bytes(b.clone()),
    }
}

/// Runtime value → record field. Integers widen to `I64`, floats to `F64`.
pub fn value_to_scalar(index: usize, v: Value) -> Result<Scalar, CoerceError> {
    match v {
        Value::Nil => Ok(Scalar::Null),
        Value::Bool(b) => Ok(Scalar::Bool(b)),
        Value::Int(i) => Ok(Scalar::I64(i)),
        Value::Float(f) => Ok(Scalar::F64(f)),
        Value::Str(s) => Ok(Scalar::Str(s)),
        Value::Bytes(b) => Ok(Scalar::Bin(b)),
        other => Err(CoerceError::Unsupported {
            index,
            type_name: other.type_name(),
        }),
    }
}
