//! Field or constant comparisons driving pass/fail branching.

use std::cmp::Ordering;

use super::resolve_operand;
use crate::domain::execution::{ActionResult, ExecutionSession};
use crate::domain::foundation::FieldValue;
use crate::domain::modules::{CompareAction, CompareOperator};

/// Evaluates compare actions. A false comparison is the normal Fail outcome,
/// not an error; the closed operator enum leaves no unknown-operator case.
#[derive(Debug, Default)]
pub struct CompareExecutor;

impl CompareExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, action: &CompareAction, session: &ExecutionSession) -> ActionResult {
        let value1 = resolve_operand(&action.input1, session);
        let value2 = resolve_operand(&action.input2, session);

        if predicate_holds(&value1, &value2, action.operator) {
            ActionResult::pass("Comparison passed")
        } else {
            ActionResult::fail("Comparison failed")
        }
    }
}

fn predicate_holds(
    value1: &Option<FieldValue>,
    value2: &Option<FieldValue>,
    operator: CompareOperator,
) -> bool {
    let text1 = render(value1);
    let text2 = render(value2);

    match operator {
        CompareOperator::Equals => text1.eq_ignore_ascii_case(&text2),
        CompareOperator::NotEquals => !text1.eq_ignore_ascii_case(&text2),
        CompareOperator::GreaterThan => compare_ordered(value1, value2) == Ordering::Greater,
        CompareOperator::LessThan => compare_ordered(value1, value2) == Ordering::Less,
        CompareOperator::GreaterOrEqual => compare_ordered(value1, value2) != Ordering::Less,
        CompareOperator::LessOrEqual => compare_ordered(value1, value2) != Ordering::Greater,
        CompareOperator::Contains => text1.to_lowercase().contains(&text2.to_lowercase()),
        CompareOperator::StartsWith => text1.to_lowercase().starts_with(&text2.to_lowercase()),
        CompareOperator::EndsWith => text1.to_lowercase().ends_with(&text2.to_lowercase()),
    }
}

/// Ordering comparison: numeric when both operands parse as decimals,
/// case-insensitive lexicographic otherwise.
fn compare_ordered(value1: &Option<FieldValue>, value2: &Option<FieldValue>) -> Ordering {
    let num1 = value1.as_ref().and_then(FieldValue::as_decimal);
    let num2 = value2.as_ref().and_then(FieldValue::as_decimal);
    if let (Some(n1), Some(n2)) = (num1, num2) {
        return n1.cmp(&n2);
    }

    render(value1).to_lowercase().cmp(&render(value2).to_lowercase())
}

fn render(value: &Option<FieldValue>) -> String {
    value.as_ref().map(FieldValue::render).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DeviceId, ModuleId};
    use crate::domain::modules::Operand;
    use chrono::Utc;

    fn session() -> ExecutionSession {
        ExecutionSession::new(None, Some(DeviceId::new("T-1")), Utc::now())
    }

    fn compare(op: CompareOperator, a: &str, b: &str) -> ActionResult {
        let action = CompareAction::new(
            ModuleId::new(),
            op,
            Operand::constant(a),
            Operand::constant(b),
        );
        CompareExecutor::new().execute(&action, &session())
    }

    #[test]
    fn equals_is_case_insensitive() {
        assert!(compare(CompareOperator::Equals, "ABC", "abc").passed());
        assert!(compare(CompareOperator::Equals, "ABC", "abd").failed());
    }

    #[test]
    fn not_equals_inverts_equals() {
        assert!(compare(CompareOperator::NotEquals, "ABC", "abd").passed());
        assert!(compare(CompareOperator::NotEquals, "ABC", "abc").failed());
    }

    #[test]
    fn greater_than_prefers_numeric_comparison() {
        // lexicographically "10" < "9"; numerically 10 > 9
        assert!(compare(CompareOperator::GreaterThan, "10", "9").passed());
        assert!(compare(CompareOperator::LessThan, "9", "10").passed());
    }

    #[test]
    fn ordering_falls_back_to_text_when_not_numeric() {
        assert!(compare(CompareOperator::LessThan, "apple", "BANANA").passed());
        assert!(compare(CompareOperator::GreaterThan, "pear", "Apple").passed());
    }

    #[test]
    fn greater_or_equal_accepts_equal_values() {
        assert!(compare(CompareOperator::GreaterOrEqual, "5", "5.0").passed());
        assert!(compare(CompareOperator::LessOrEqual, "5", "5.0").passed());
    }

    #[test]
    fn contains_starts_ends_ignore_case() {
        assert!(compare(CompareOperator::Contains, "Warehouse", "HOUSE").passed());
        assert!(compare(CompareOperator::StartsWith, "Warehouse", "ware").passed());
        assert!(compare(CompareOperator::EndsWith, "Warehouse", "HOUSE").passed());
        assert!(compare(CompareOperator::Contains, "Warehouse", "dock").failed());
    }

    #[test]
    fn unset_field_compares_as_empty_text() {
        let action = CompareAction::new(
            ModuleId::new(),
            CompareOperator::Equals,
            Operand::field(ModuleId::new()),
            Operand::constant(""),
        );
        assert!(CompareExecutor::new().execute(&action, &session()).passed());
    }

    #[test]
    fn field_operand_reads_session_value() {
        let field = ModuleId::new();
        let mut s = session();
        s.set_field(field, Some(FieldValue::Integer(12)));

        let action = CompareAction::new(
            ModuleId::new(),
            CompareOperator::GreaterThan,
            Operand::field(field),
            Operand::constant("9"),
        );
        assert!(CompareExecutor::new().execute(&action, &s).passed());
    }
}
