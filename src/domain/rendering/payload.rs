//! The screen payload wire contract.
//!
//! Terminal rendering clients depend on this exact shape; regions that were
//! never populated are omitted from the serialized form.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ModuleId;

/// A rendered terminal screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ScreenContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ScreenOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<ScreenPrompt>,
}

/// Central content block: one paragraph plus appended lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<String>,
    #[serde(default)]
    pub lines: Vec<String>,
}

/// One soft-key option, parsed from a `KEY:LABEL` token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenOption {
    pub value: String,
    pub text: String,
}

/// Input prompt block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenPrompt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked: Option<ScreenMask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_field_id: Option<ModuleId>,
}

/// Masking indicator for the prompt. `on` is the literal token `"TRUE"` or
/// `"FALSE"`; the mask character is always `"*"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenMask {
    pub on: String,
    #[serde(rename = "char")]
    pub mask_char: String,
}

impl ScreenMask {
    pub fn from_echo(echo: bool) -> Self {
        Self {
            on: if echo { "TRUE" } else { "FALSE" }.to_string(),
            mask_char: "*".to_string(),
        }
    }
}
