//! Operand shape shared by compare and calculate definitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ModuleId;

/// One input to a compare or calculate operation: a constant literal, a
/// reference to a session field, or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Constant(String),
    Field(ModuleId),
    Empty,
}

impl Operand {
    pub fn constant(value: impl Into<String>) -> Self {
        Operand::Constant(value.into())
    }

    pub fn field(id: ModuleId) -> Self {
        Operand::Field(id)
    }
}
