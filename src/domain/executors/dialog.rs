//! Dialog presentation and input delivery.

use crate::domain::execution::{ActionResult, ExecutionSession, ModuleCache, PauseMarker};
use crate::domain::foundation::FieldValue;
use crate::domain::modules::DialogAction;
use crate::domain::rendering::build_screen;

/// Presents dialog screens and delivers submitted input.
///
/// Presentation suspends the session: the rendered screen plus the pausing
/// step are recorded as the session's pause marker, and the interpreter stops
/// advancing until input arrives.
#[derive(Debug, Default)]
pub struct DialogExecutor;

impl DialogExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Renders the dialog's screen and pauses the session at `at_step`.
    pub fn present(
        &self,
        dialog: &DialogAction,
        cache: &ModuleCache,
        session: &mut ExecutionSession,
        at_step: i32,
    ) -> ActionResult {
        let Some(detail) = dialog.primary_detail() else {
            return ActionResult::fail("No screen format defined for dialog");
        };

        let Some(format) = cache.screen_format(detail.screen_format_id) else {
            return ActionResult::fail(format!(
                "Screen format {} not found",
                detail.screen_format_id
            ));
        };

        let screen = build_screen(format, session);
        session.pause(PauseMarker {
            dialog_id: dialog.id,
            step: at_step,
            screen,
        });

        ActionResult::pass("Dialog displayed, awaiting input")
    }

    /// Writes the raw input into the screen's input field and clears the
    /// pause marker.
    ///
    /// No type coercion happens here; the value is coerced, if at all, the
    /// next time it is consumed.
    pub fn submit_input(
        &self,
        dialog: &DialogAction,
        cache: &ModuleCache,
        session: &mut ExecutionSession,
        input: &str,
    ) -> ActionResult {
        let Some(detail) = dialog.primary_detail() else {
            return ActionResult::fail("No screen format detail");
        };

        let Some(format) = cache.screen_format(detail.screen_format_id) else {
            return ActionResult::fail("Screen format not found");
        };

        if let Some(field_id) = format.input_detail().and_then(|d| d.target_field()) {
            session.set_field(field_id, Some(FieldValue::Text(input.to_string())));
        }

        session.resume();
        ActionResult::pass("Input processed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DeviceId, ModuleId};
    use crate::domain::modules::{
        DataUsage, DialogDetail, ScreenData, ScreenDetail, ScreenFormat,
    };
    use chrono::Utc;

    fn session() -> ExecutionSession {
        ExecutionSession::new(None, Some(DeviceId::new("T-1")), Utc::now())
    }

    fn dialog_with_screen(input_field: ModuleId) -> (DialogAction, ModuleCache) {
        let mut cache = ModuleCache::new();
        let format_id = ModuleId::new();
        cache.add_screen_format(ScreenFormat::new(
            format_id,
            4,
            vec![
                ScreenDetail::new(1, DataUsage::Label, ScreenData::Literal("USER ID".into()), 6),
                ScreenDetail::new(2, DataUsage::Input, ScreenData::Input(Some(input_field)), 7),
            ],
        ));
        let dialog = DialogAction::new(ModuleId::new(), vec![DialogDetail::new(4, format_id)]);
        (dialog, cache)
    }

    #[test]
    fn present_pauses_session_with_screen() {
        let (dialog, cache) = dialog_with_screen(ModuleId::new());
        let mut s = session();

        let result = DialogExecutor::new().present(&dialog, &cache, &mut s, 3);

        assert!(result.passed());
        assert!(s.is_paused());
        let marker = s.pause_marker().unwrap();
        assert_eq!(marker.dialog_id, dialog.id);
        assert_eq!(marker.step, 3);
        assert_eq!(
            marker.screen.prompt.as_ref().unwrap().label.as_deref(),
            Some("USER ID")
        );
    }

    #[test]
    fn present_fails_without_screen_format() {
        let dialog = DialogAction::new(ModuleId::new(), vec![]);
        let cache = ModuleCache::new();
        let mut s = session();

        let result = DialogExecutor::new().present(&dialog, &cache, &mut s, 1);
        assert!(result.failed());
        assert!(!s.is_paused());
    }

    #[test]
    fn present_fails_when_format_missing_from_cache() {
        let dialog =
            DialogAction::new(ModuleId::new(), vec![DialogDetail::new(4, ModuleId::new())]);
        let cache = ModuleCache::new();
        let mut s = session();

        assert!(DialogExecutor::new().present(&dialog, &cache, &mut s, 1).failed());
    }

    #[test]
    fn submit_input_writes_field_and_clears_pause() {
        let field = ModuleId::new();
        let (dialog, cache) = dialog_with_screen(field);
        let mut s = session();
        let executor = DialogExecutor::new();

        executor.present(&dialog, &cache, &mut s, 2);
        assert!(s.is_paused());

        let result = executor.submit_input(&dialog, &cache, &mut s, "7");

        assert!(result.passed());
        assert!(!s.is_paused());
        assert_eq!(s.field(field), Some(&FieldValue::Text("7".into())));
    }

    #[test]
    fn submit_input_keeps_raw_text() {
        let field = ModuleId::new();
        let (dialog, cache) = dialog_with_screen(field);
        let mut s = session();
        let executor = DialogExecutor::new();
        executor.present(&dialog, &cache, &mut s, 1);

        executor.submit_input(&dialog, &cache, &mut s, "0042");
        assert_eq!(s.render_field(field), "0042");
    }
}
