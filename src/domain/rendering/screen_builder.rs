//! Builds a screen payload from a screen format and the session's current
//! field values.
//!
//! Region routing follows the fixed terminal layout convention: row 1 is the
//! heading, rows 2-5 the content block (row 2 the paragraph, 3-5 appended
//! lines), rows 6-7 the prompt label, and row 8 the options bar. Downstream
//! terminal clients depend on these row numbers; do not change them.

use super::payload::{Screen, ScreenContent, ScreenMask, ScreenOption, ScreenPrompt};
use crate::domain::execution::ExecutionSession;
use crate::domain::modules::{DataUsage, ScreenData, ScreenDetail, ScreenFormat};

/// Renders a screen format against the session's field store.
pub fn build_screen(format: &ScreenFormat, session: &ExecutionSession) -> Screen {
    let mut details: Vec<&ScreenDetail> = format.details.iter().collect();
    details.sort_by_key(|d| d.sequence);

    let mut screen = Screen::default();
    for detail in details {
        let value = element_value(detail, session);
        match detail.usage {
            DataUsage::Input => add_input(detail, value, &mut screen),
            DataUsage::Label => add_label(detail, value, &mut screen),
            DataUsage::Read | DataUsage::Output => add_display(detail, value, &mut screen),
        }
    }
    screen
}

fn element_value(detail: &ScreenDetail, session: &ExecutionSession) -> String {
    match &detail.data {
        // DEFAULT is the designer's placeholder literal; it renders empty
        ScreenData::Literal(text) => {
            if text == "DEFAULT" {
                String::new()
            } else {
                text.clone()
            }
        }
        ScreenData::Field(field_id) => session.render_field(*field_id),
        ScreenData::Input(_) => String::new(),
    }
}

fn add_input(detail: &ScreenDetail, value: String, screen: &mut Screen) {
    let prompt = screen.prompt.get_or_insert_with(ScreenPrompt::default);
    prompt.default_value = Some(value.clone());
    prompt.display_value = Some(value);
    prompt.masked = Some(ScreenMask::from_echo(detail.echo));
    prompt.input_field_id = detail.target_field();
}

fn add_label(detail: &ScreenDetail, value: String, screen: &mut Screen) {
    if detail.row == 6 || detail.row == 7 {
        let prompt = screen.prompt.get_or_insert_with(ScreenPrompt::default);
        prompt.label = Some(value);
    }
}

fn add_display(detail: &ScreenDetail, value: String, screen: &mut Screen) {
    match detail.row {
        1 => screen.heading = Some(value),
        2..=5 => {
            let content = screen.content.get_or_insert_with(ScreenContent::default);
            if detail.row == 2 {
                content.paragraph = Some(value);
            } else {
                content.lines.push(value);
            }
        }
        8 => parse_options(&value, screen),
        _ => {}
    }
}

fn parse_options(options_text: &str, screen: &mut Screen) {
    if options_text.is_empty() {
        return;
    }

    let mut options = Vec::new();
    for part in options_text.split_whitespace() {
        let pieces: Vec<&str> = part.split(':').collect();
        if pieces.len() == 2 {
            options.push(ScreenOption {
                value: pieces[0].trim().to_string(),
                text: pieces[1].trim().to_string(),
            });
        }
    }
    screen.options = Some(options);
}
