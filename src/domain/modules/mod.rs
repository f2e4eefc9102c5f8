//! Module definitions: the data describing processes, actions, fields, and
//! screens. Definitions are loaded once per application and are immutable for
//! the lifetime of that load.

mod calculate;
mod compare;
mod database;
mod dialog;
mod field;
mod module;
mod operand;
mod process;
mod screen;

pub use calculate::{CalculateAction, CalculateOperator, CalculateStep};
pub use compare::{CompareAction, CompareOperator};
pub use database::DatabaseAction;
pub use dialog::{DialogAction, DialogDetail};
pub use field::Field;
pub use module::{Module, ModuleKind};
pub use operand::Operand;
pub use process::{ActionKind, ProcessModule, ProcessStep};
pub use screen::{DataUsage, ScreenData, ScreenDetail, ScreenFormat};
