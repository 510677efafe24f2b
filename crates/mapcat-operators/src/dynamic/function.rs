//! Invocable functions and their names.

use std::fmt;

use thiserror::Error;

use super::resolver::ResolveError;
use super::value::Value;

/// An error raised by a user function while running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A resolved function: takes its whole argument list, returns one value.
pub trait DynFn: Send + Sync {
    fn apply(&self, args: Vec<Value>) -> Result<Value, RuntimeError>;
}

impl<F> DynFn for F
where
    F: Fn(Vec<Value>) -> Result<Value, RuntimeError> + Send + Sync,
{
    fn apply(&self, args: Vec<Value>) -> Result<Value, RuntimeError> {
        self(args)
    }
}

/// Namespace-qualified function name, written `ns/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnName {
    pub ns: String,
    pub name: String,
}

impl FnName {
    pub fn new(ns: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ns: ns.into(),
            name: name.into(),
        }
    }

    /// Parse `ns/name`. The split is at the last `/`, so a namespace may
    /// contain `/` but a name may not.
    pub fn parse(s: &str) -> Result<Self, ResolveError> {
        Self::parse_with_default(s, None)
    }

    /// Parse `ns/name`, or a bare `name` qualified by `default_ns`.
    pub fn parse_with_default(s: &str, default_ns: Option<&str>) -> Result<Self, ResolveError> {
        let s = s.trim();
        let (ns, name) = match s.rsplit_once('/') {
            Some((ns, name)) => (ns, name),
            None => match default_ns {
                Some(ns) => (ns, s),
                None => return Err(ResolveError::InvalidName(s.to_string())),
            },
        };
        if ns.is_empty() || name.is_empty() {
            return Err(ResolveError::InvalidName(s.to_string()));
        }
        Ok(Self::new(ns, name))
    }
}

impl fmt::Display for FnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ns, self.name)
    }
}
