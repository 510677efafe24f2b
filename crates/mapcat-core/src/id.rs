//! Strongly-typed identifiers used across the workspace.
//!
//! Downstream crates (exec, operators) should *not* use raw integers for IDs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

new_id!(PartitionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_type_name() {
        assert_eq!(PartitionId::new(3).to_string(), "PartitionId(3)");
        assert_eq!(PartitionId::new(7).get(), 7);
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&PartitionId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
