//! Compare action definitions.

use serde::{Deserialize, Serialize};

use super::Operand;
use crate::domain::foundation::ModuleId;

/// Comparison predicate between two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Contains,
    StartsWith,
    EndsWith,
}

/// A two-operand comparison whose outcome drives step branching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareAction {
    pub id: ModuleId,
    pub operator: CompareOperator,
    pub input1: Operand,
    pub input2: Operand,
}

impl CompareAction {
    pub fn new(id: ModuleId, operator: CompareOperator, input1: Operand, input2: Operand) -> Self {
        Self {
            id,
            operator,
            input1,
            input2,
        }
    }
}
