//! Action executors: stateless-per-call evaluators the interpreter
//! dispatches steps to, each reading and writing an execution session using
//! definitions from the cache.

mod calculate;
mod compare;
mod database;
mod dialog;
mod process;

pub use calculate::CalculateExecutor;
pub use compare::CompareExecutor;
pub use database::DatabaseExecutor;
pub use dialog::DialogExecutor;
pub use process::{Parameters, ProcessExecutor};

use crate::domain::execution::ExecutionSession;
use crate::domain::foundation::FieldValue;
use crate::domain::modules::Operand;

/// Resolves an operand to its runtime value: constants are text literals,
/// field references read the session store, and an unset field is null.
pub(crate) fn resolve_operand(operand: &Operand, session: &ExecutionSession) -> Option<FieldValue> {
    match operand {
        Operand::Constant(value) => Some(FieldValue::Text(value.clone())),
        Operand::Field(field_id) => session.field(*field_id).cloned(),
        Operand::Empty => None,
    }
}
