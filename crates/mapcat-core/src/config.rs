//! Engine configuration that downstream crates can serialize/deserialize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What an operator does with a record whose processing failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Report the failure, count the record as skipped, keep going.
    #[default]
    Lenient,
    /// Surface the failure to the host.
    Strict,
}

impl FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(ErrorPolicy::Lenient),
            "strict" => Ok(ErrorPolicy::Strict),
            other => Err(Error::Config(format!("unknown error policy '{other}'"))),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Lenient => f.write_str("lenient"),
            ErrorPolicy::Strict => f.write_str("strict"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Partitions run concurrently, each with its own operator instance.
    pub max_parallel_tasks: usize,

    /// Per-record failure policy handed to operators built from this config.
    pub error_policy: ErrorPolicy,

    /// Namespace applied to bare function names (no `ns/` prefix).
    pub default_namespace: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_parallel_tasks: 4,
            error_policy: ErrorPolicy::Lenient,
            default_namespace: None,
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `MAPCAT_MAX_PARALLEL_TASKS`: max concurrently running partitions
    /// - `MAPCAT_ERROR_POLICY`: `lenient` or `strict`
    /// - `MAPCAT_DEFAULT_NAMESPACE`: namespace for bare function names
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] but reading from an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = lookup("MAPCAT_MAX_PARALLEL_TASKS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_parallel_tasks = v;
            }
        }

        if let Some(s) = lookup("MAPCAT_ERROR_POLICY") {
            if let Ok(v) = s.parse::<ErrorPolicy>() {
                cfg.error_policy = v;
            }
        }

        if let Some(s) = lookup("MAPCAT_DEFAULT_NAMESPACE") {
            if !s.trim().is_empty() {
                cfg.default_namespace = Some(s.trim().to_string());
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_parallel_tasks == 0 {
            return Err(Error::Config("max_parallel_tasks must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_lenient() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.error_policy, ErrorPolicy::Lenient);
        assert_eq!(cfg.max_parallel_tasks, 4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn lookup_overrides_and_ignores_garbage() {
        let cfg = EngineConfig::from_lookup(lookup_from(&[
            ("MAPCAT_MAX_PARALLEL_TASKS", "not-a-number"),
            ("MAPCAT_ERROR_POLICY", "Strict"),
            ("MAPCAT_DEFAULT_NAMESPACE", " user.fns "),
        ]));
        assert_eq!(cfg.max_parallel_tasks, 4);
        assert_eq!(cfg.error_policy, ErrorPolicy::Strict);
        assert_eq!(cfg.default_namespace.as_deref(), Some("user.fns"));
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let cfg = EngineConfig {
            max_parallel_tasks: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn policy_serde_is_lowercase() {
        let json = serde_json::to_string(&ErrorPolicy::Strict).unwrap();
        assert_eq!(json, "\"strict\"");
        assert!("bogus".parse::<ErrorPolicy>().is_err());
    }
}
