//! Common module envelope shared by all definition kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ApplicationId, ModuleId};

/// Kind discriminator for module envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    Application,
    Process,
    CalculateAction,
    CompareAction,
    DatabaseAction,
    Field,
    ScreenFormat,
    DialogAction,
}

/// Versioned, named envelope every specialized definition hangs off.
///
/// The specialized payload (process, action, field, screen format) is keyed
/// 1:1 by the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub application_id: ApplicationId,
    pub kind: ModuleKind,
    pub version: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Module {
    /// Creates an envelope with fresh timestamps, version 1.
    pub fn new(
        id: ModuleId,
        application_id: ApplicationId,
        kind: ModuleKind,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            application_id,
            kind,
            version: 1,
            name: name.into(),
            description: None,
            created_at: now,
            modified_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_module_starts_at_version_one() {
        let module = Module::new(
            ModuleId::new(),
            ApplicationId::new(),
            ModuleKind::Process,
            "LOGIN",
        );
        assert_eq!(module.version, 1);
        assert_eq!(module.name, "LOGIN");
        assert_eq!(module.kind, ModuleKind::Process);
    }
}
