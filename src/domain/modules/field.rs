//! Field definitions: typed named variables of the runtime field store.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{FieldType, ModuleId};

/// A field declaration. Addressed by id at runtime, and resolvable by the
/// owning module's name (case-insensitively) for parameter binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: ModuleId,
    pub field_type: FieldType,
    pub default_value: Option<String>,
}

impl Field {
    pub fn new(id: ModuleId, field_type: FieldType) -> Self {
        Self {
            id,
            field_type,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}
