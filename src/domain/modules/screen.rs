//! Screen format definitions: the layout a dialog renders to a terminal.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ModuleId;

/// How a screen element participates in the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataUsage {
    /// Operator enters a value here.
    Input,
    /// Display only.
    Output,
    /// Display the current value of a field.
    Read,
    /// Static label.
    Label,
}

/// What a screen element shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScreenData {
    /// Hard-coded text. The sentinel literal `DEFAULT` renders empty.
    Literal(String),
    /// User-entry placeholder; carries the target field the entered value is
    /// written to.
    Input(Option<ModuleId>),
    /// Current session value of a field.
    Field(ModuleId),
}

/// One positioned element of a screen format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenDetail {
    pub sequence: i32,
    pub usage: DataUsage,
    pub data: ScreenData,
    pub row: i32,
    pub column: i32,
    pub width: i32,
    pub height: i32,
    /// Masking indicator for input elements (badge scans, passwords).
    pub echo: bool,
    pub overflow_mode: i32,
}

impl ScreenDetail {
    pub fn new(sequence: i32, usage: DataUsage, data: ScreenData, row: i32) -> Self {
        Self {
            sequence,
            usage,
            data,
            row,
            column: 1,
            width: 0,
            height: 1,
            echo: false,
            overflow_mode: 0,
        }
    }

    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    /// The field this element reads or writes, if any.
    pub fn target_field(&self) -> Option<ModuleId> {
        match &self.data {
            ScreenData::Input(field) => *field,
            ScreenData::Field(field) => Some(*field),
            ScreenData::Literal(_) => None,
        }
    }
}

/// A terminal screen layout, bound to a physical screen group
/// (4 = 8x16, 6 = 6x40, 8 = 8x20).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenFormat {
    pub id: ModuleId,
    pub screen_group: i32,
    pub soft_key_id: Option<ModuleId>,
    pub details: Vec<ScreenDetail>,
}

impl ScreenFormat {
    pub fn new(id: ModuleId, screen_group: i32, details: Vec<ScreenDetail>) -> Self {
        Self {
            id,
            screen_group,
            soft_key_id: None,
            details,
        }
    }

    /// The first input element, which receives submitted dialog input.
    pub fn input_detail(&self) -> Option<&ScreenDetail> {
        self.details.iter().find(|d| d.usage == DataUsage::Input)
    }
}
