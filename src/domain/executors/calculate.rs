//! Multi-step calculations over the session field store.

use rust_decimal::Decimal;
use thiserror::Error;

use super::resolve_operand;
use crate::domain::execution::{ActionResult, ExecutionSession};
use crate::domain::foundation::FieldValue;
use crate::domain::modules::{CalculateAction, CalculateOperator, CalculateStep};

#[derive(Debug, Error)]
enum CalculateError {
    #[error("cannot divide by zero")]
    DivideByZero,

    #[error("decimal arithmetic overflow")]
    Overflow,
}

/// Evaluates calculate actions: each detail in ascending sequence order,
/// sharing the field store so later steps may consume earlier results.
///
/// An error aborts the remaining details and fails the whole action; writes
/// already performed stay in place (last-good-state, not transactional).
#[derive(Debug, Default)]
pub struct CalculateExecutor;

impl CalculateExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, action: &CalculateAction, session: &mut ExecutionSession) -> ActionResult {
        let mut steps: Vec<&CalculateStep> = action.steps.iter().collect();
        steps.sort_by_key(|s| s.sequence);

        for step in steps {
            if let Err(e) = apply(step, session) {
                return ActionResult::fail_with_cause(format!("Calculation failed: {}", e), e);
            }
        }
        ActionResult::pass("Calculations completed")
    }
}

fn apply(step: &CalculateStep, session: &mut ExecutionSession) -> Result<(), CalculateError> {
    let input1 = resolve_operand(&step.input1, session);
    let input2 = resolve_operand(&step.input2, session);

    let result = match step.operator {
        CalculateOperator::Assign => input1,
        CalculateOperator::Concatenate => Some(FieldValue::Text(format!(
            "{}{}",
            render(&input1),
            render(&input2)
        ))),
        CalculateOperator::Add => Some(numeric(&input1)
            .checked_add(numeric(&input2))
            .ok_or(CalculateError::Overflow)?
            .into()),
        CalculateOperator::Subtract => Some(numeric(&input1)
            .checked_sub(numeric(&input2))
            .ok_or(CalculateError::Overflow)?
            .into()),
        CalculateOperator::Multiply => Some(numeric(&input1)
            .checked_mul(numeric(&input2))
            .ok_or(CalculateError::Overflow)?
            .into()),
        CalculateOperator::Divide => {
            let divisor = numeric(&input2);
            if divisor.is_zero() {
                return Err(CalculateError::DivideByZero);
            }
            Some(numeric(&input1)
                .checked_div(divisor)
                .ok_or(CalculateError::Overflow)?
                .into())
        }
        CalculateOperator::Modulus => {
            let divisor = numeric(&input2);
            if divisor.is_zero() {
                return Err(CalculateError::DivideByZero);
            }
            Some(numeric(&input1)
                .checked_rem(divisor)
                .ok_or(CalculateError::Overflow)?
                .into())
        }
        CalculateOperator::Clear => None,
    };

    session.set_field(step.result_field, result);
    Ok(())
}

/// Non-numeric or absent operands coerce to zero.
fn numeric(value: &Option<FieldValue>) -> Decimal {
    value
        .as_ref()
        .and_then(FieldValue::as_decimal)
        .unwrap_or(Decimal::ZERO)
}

fn render(value: &Option<FieldValue>) -> String {
    value.as_ref().map(FieldValue::render).unwrap_or_default()
}
