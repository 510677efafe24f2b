//! Logical schema types. Pure data.
//!
//! An operator declares the fields it produces as a `Schema`. Only the names
//! and the arity are load-bearing for the flat-map operator; data types are
//! carried for hosts that want them but are never checked against values.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Build a schema from field names alone (nullable `Utf8` placeholders).
    pub fn of_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names
                .into_iter()
                .map(|n| Field::new(n, DataType::Utf8, true))
                .collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Field names must be unique; positional and named access would disagree otherwise.
    pub fn validate(&self) -> Result<()> {
        for (i, f) in self.fields.iter().enumerate() {
            if f.name.is_empty() {
                return Err(Error::Schema(format!("field {i} has an empty name")));
            }
            if self.fields[..i].iter().any(|g| g.name == f.name) {
                return Err(Error::Schema(format!("duplicate field name '{}'", f.name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_names_preserves_order() {
        let s = Schema::of_names(["a", "b", "c"]);
        assert_eq!(s.arity(), 3);
        assert_eq!(s.index_of("b"), Some(1));
        assert_eq!(s.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn validate_rejects_duplicates() {
        assert!(Schema::of_names(["a", "a"]).validate().is_err());
        assert!(Schema::of_names([""]).validate().is_err());
        assert!(Schema::of_names(["a", "b"]).validate().is_ok());
    }
}
