//! Operator planning surface.

use mapcat_core::prelude::Schema;
use serde::{Deserialize, Serialize};

/// What an operator promises to produce, computed before any record flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpPlan {
    pub output_schema: Schema,

    /// Whether one input may yield more (or fewer) than one output.
    pub fan_out: bool,
}

impl OpPlan {
    pub fn new(output_schema: Schema) -> Self {
        Self {
            output_schema,
            fan_out: false,
        }
    }

    pub fn with_fan_out(mut self, fan_out: bool) -> Self {
        self.fan_out = fan_out;
        self
    }
}
