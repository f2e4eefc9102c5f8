//! Dialog action definitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ModuleId;

/// One screen-format binding of a dialog, per device screen group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogDetail {
    pub screen_group: i32,
    pub screen_format_id: ModuleId,
    pub reference: i32,
    pub key_entry: bool,
}

impl DialogDetail {
    pub fn new(screen_group: i32, screen_format_id: ModuleId) -> Self {
        Self {
            screen_group,
            screen_format_id,
            reference: 0,
            key_entry: false,
        }
    }
}

/// A terminal dialog: execution pauses here until the operator answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogAction {
    pub id: ModuleId,
    pub details: Vec<DialogDetail>,
}

impl DialogAction {
    pub fn new(id: ModuleId, details: Vec<DialogDetail>) -> Self {
        Self { id, details }
    }

    /// The screen format used for presentation.
    ///
    /// Selection by the device's screen group is an extension point; the
    /// first detail wins for now.
    pub fn primary_detail(&self) -> Option<&DialogDetail> {
        self.details.first()
    }
}
