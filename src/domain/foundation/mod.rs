//! Foundation value objects shared across the domain layer.

mod errors;
mod field_value;
mod ids;

pub use errors::DefinitionError;
pub use field_value::{FieldType, FieldValue};
pub use ids::{ApplicationId, DeviceId, ModuleId, SessionId};
