//! Database action definitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ModuleId;

/// A SQL-like statement template.
///
/// The text is opaque to the engine except for the placeholder grammar: an
/// optional leading `CONNECT <name>;` directive, `::#5#<uuid>#::` field
/// tokens, and an optional `RETURNS(...)` clause naming the fields a result
/// row populates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseAction {
    pub id: ModuleId,
    pub statement: String,
}

impl DatabaseAction {
    pub fn new(id: ModuleId, statement: impl Into<String>) -> Self {
        Self {
            id,
            statement: statement.into(),
        }
    }
}
