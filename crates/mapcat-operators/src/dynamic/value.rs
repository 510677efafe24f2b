//! Dynamically-typed runtime values.

use std::fmt;

use super::function::RuntimeError;

/// A value as seen by user functions.
///
/// `Lazy` is single-pass: it can be walked once and is neither cloned nor
/// compared by content.
#[derive(Debug, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    /// Ordered key/value pairs.
    Map(Vec<(Value, Value)>),
    Lazy(LazySeq),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Lazy(_) => "lazy-seq",
        }
    }

    pub fn list<I>(items: I) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        Value::List(items.into_iter().collect())
    }

    /// View this value as a sequence of its elements.
    ///
    /// `Nil` is the empty sequence. Maps yield their entries as two-element
    /// lists. Scalars are not sequences; the error carries the type name.
    pub fn into_seq(self) -> Result<Seq, &'static str> {
        match self {
            Value::Nil => Ok(Seq::Empty),
            Value::List(items) => Ok(Seq::Items(items.into_iter())),
            Value::Map(entries) => Ok(Seq::Entries(entries.into_iter())),
            Value::Lazy(lazy) => Ok(Seq::Lazy(lazy)),
            other => Err(other.type_name()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

type BoxedIter = Box<dyn Iterator<Item = Result<Value, RuntimeError>> + Send>;

/// A finite, single-pass sequence produced on demand.
///
/// Elements are pulled one at a time; producing an element may fail.
pub struct LazySeq {
    inner: BoxedIter,
}

impl LazySeq {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<Value, RuntimeError>> + Send + 'static,
    {
        Self {
            inner: Box::new(iter),
        }
    }

    /// Wrap infallible values.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self::new(values.into_iter().map(Ok))
    }
}

impl Iterator for LazySeq {
    type Item = Result<Value, RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl fmt::Debug for LazySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#<lazy-seq>")
    }
}

impl PartialEq for LazySeq {
    /// Never equal: comparing would consume both sides.
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

/// Iteration over the elements of a seqable `Value`.
#[derive(Debug)]
pub enum Seq {
    Empty,
    Items(std::vec::IntoIter<Value>),
    Entries(std::vec::IntoIter<(Value, Value)>),
    Lazy(LazySeq),
}

impl Iterator for Seq {
    type Item = Result<Value, RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Seq::Empty => None,
            Seq::Items(items) => items.next().map(Ok),
            Seq::Entries(entries) => entries.next().map(|(k, v)| Ok(Value::List(vec![k, v]))),
            Seq::Lazy(lazy) => lazy.next(),
        }
    }
}
