//! Calculate action definitions.

use serde::{Deserialize, Serialize};

use super::Operand;
use crate::domain::foundation::ModuleId;

/// Arithmetic or assignment operation within a calculate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculateOperator {
    Assign,
    Concatenate,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Clear,
}

/// One step of a calculate action: operands, operator, and the field the
/// result lands in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateStep {
    pub sequence: i32,
    pub operator: CalculateOperator,
    pub input1: Operand,
    pub input2: Operand,
    pub result_field: ModuleId,
}

impl CalculateStep {
    pub fn new(
        sequence: i32,
        operator: CalculateOperator,
        input1: Operand,
        input2: Operand,
        result_field: ModuleId,
    ) -> Self {
        Self {
            sequence,
            operator,
            input1,
            input2,
            result_field,
        }
    }
}

/// Ordered multi-step calculation sharing the session field store, so later
/// steps may consume earlier results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateAction {
    pub id: ModuleId,
    pub steps: Vec<CalculateStep>,
}

impl CalculateAction {
    pub fn new(id: ModuleId, steps: Vec<CalculateStep>) -> Self {
        Self { id, steps }
    }
}
