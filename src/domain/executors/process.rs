//! The step interpreter: program-counter-style sequencing with labeled
//! jumps, pass/fail branching, nested process calls, and pause/resume
//! continuation.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;

use super::{
    CalculateExecutor, CompareExecutor, DatabaseExecutor, DialogExecutor,
};
use crate::config::EngineConfig;
use crate::domain::execution::{ActionResult, ExecutionFrame, ExecutionSession, ModuleCache};
use crate::domain::foundation::{FieldValue, ModuleId};
use crate::domain::modules::{ActionKind, ProcessModule, ProcessStep};
use crate::ports::DatabaseGateway;

/// Named parameters bound to fields on process entry.
pub type Parameters = HashMap<String, FieldValue>;

/// Walks a process module's steps, dispatching each to the matching action
/// executor and applying pass/fail branching.
///
/// The executor holds no per-session state; it mutates the session it is
/// handed. Callers must serialize executions per session.
pub struct ProcessExecutor {
    compare: CompareExecutor,
    calculate: CalculateExecutor,
    database: DatabaseExecutor,
    dialog: DialogExecutor,
    max_call_depth: usize,
    max_step_iterations: usize,
}

impl ProcessExecutor {
    pub fn new(config: &EngineConfig, gateway: Arc<dyn DatabaseGateway>) -> Self {
        Self {
            compare: CompareExecutor::new(),
            calculate: CalculateExecutor::new(),
            database: DatabaseExecutor::new(config, gateway),
            dialog: DialogExecutor::new(),
            max_call_depth: config.max_call_depth,
            max_step_iterations: config.max_step_iterations,
        }
    }

    /// Runs a process from its first step.
    ///
    /// Pushes an execution frame, binds named parameters to fields, and
    /// interprets steps until the process returns, fails, or pauses at a
    /// dialog. On every exit except a pause the frame is popped, and the
    /// session's database connection is released once the stack empties.
    pub async fn execute(
        &self,
        process_id: ModuleId,
        cache: &ModuleCache,
        session: &mut ExecutionSession,
        parameters: Option<Parameters>,
    ) -> ActionResult {
        self.enter(process_id, cache, session, parameters).await
    }

    /// Resumes a paused session with operator input.
    ///
    /// Delivers the input to the dialog that paused execution, then continues
    /// inside the current frame from the step after the one that paused.
    pub async fn resume(
        &self,
        cache: &ModuleCache,
        session: &mut ExecutionSession,
        input: &str,
    ) -> ActionResult {
        let Some(marker) = session.pause_marker().cloned() else {
            return ActionResult::fail("Session is not paused");
        };

        let Some(dialog) = cache.dialog_action(marker.dialog_id) else {
            return ActionResult::fail(format!(
                "Dialog action {} not found in cache",
                marker.dialog_id
            ));
        };

        let input_result = self.dialog.submit_input(dialog, cache, session, input);
        if input_result.failed() {
            return input_result;
        }

        let Some(frame) = session.current_frame() else {
            return ActionResult::fail("No execution frame available");
        };
        let process_id = frame.process_id;

        let Some(process) = cache.process(process_id) else {
            return ActionResult::fail(format!(
                "Process module {} not found in cache",
                process_id
            ));
        };

        let result = self.run_steps(process, cache, session, marker.step + 1).await;

        if session.is_paused() {
            return result;
        }

        // The suspended call chain is finished as a unit: unwind the frames
        // retained across the pause and release the connection.
        while session.pop_frame().is_some() {}
        session.close_connection().await;
        result
    }

    /// Recursive entry point; boxed so `Call` steps can re-enter.
    fn enter<'a>(
        &'a self,
        process_id: ModuleId,
        cache: &'a ModuleCache,
        session: &'a mut ExecutionSession,
        parameters: Option<Parameters>,
    ) -> BoxFuture<'a, ActionResult> {
        Box::pin(async move {
            if session.call_depth() >= self.max_call_depth {
                return ActionResult::fail(format!(
                    "Max call depth ({}) exceeded",
                    self.max_call_depth
                ));
            }

            let Some(process) = cache.process(process_id) else {
                return ActionResult::fail(format!(
                    "Process module {} not found in cache",
                    process_id
                ));
            };
            let Some(module) = cache.module(process_id) else {
                return ActionResult::fail(format!("Module {} not found in cache", process_id));
            };

            let mut frame = ExecutionFrame::new(process_id, module.name.clone());
            if let Some(params) = &parameters {
                frame.parameters = params.keys().cloned().collect();
            }
            session.push_frame(frame);

            if let Some(params) = parameters {
                bind_parameters(params, cache, session);
            }

            let result = self.run_steps(process, cache, session, 1).await;

            if session.is_paused() {
                // frame stays on the stack for resume
                return result;
            }

            session.pop_frame();
            if session.call_depth() == 0 {
                session.close_connection().await;
            }
            result
        })
    }

    async fn run_steps(
        &self,
        process: &ProcessModule,
        cache: &ModuleCache,
        session: &mut ExecutionSession,
        start_sequence: i32,
    ) -> ActionResult {
        let mut current = start_sequence;
        let mut iterations = 0usize;

        while iterations < self.max_step_iterations {
            iterations += 1;

            let Some(step) = process.step_at(current) else {
                return ActionResult::fail(format!("Step with sequence {} not found", current));
            };

            if step.commented {
                current += 1;
                continue;
            }

            let result = self.run_step(step, cache, session, current).await;

            if session.is_paused() {
                return result;
            }

            if matches!(step.action, ActionKind::ReturnPass | ActionKind::ReturnFail) {
                return result;
            }

            let branch = if result.passed() {
                step.pass_label.as_deref()
            } else {
                step.fail_label.as_deref()
            };

            match resolve_next(&process.steps, current, branch) {
                Some(next) => current = next,
                None => return result,
            }
        }

        ActionResult::fail(format!(
            "Maximum iteration limit ({}) reached",
            self.max_step_iterations
        ))
    }

    async fn run_step(
        &self,
        step: &ProcessStep,
        cache: &ModuleCache,
        session: &mut ExecutionSession,
        current_sequence: i32,
    ) -> ActionResult {
        match step.action {
            ActionKind::ReturnPass => ActionResult::pass("Process completed"),
            ActionKind::ReturnFail => ActionResult::fail("Process failed"),

            ActionKind::Call => {
                let Some(target) = step.action_id else {
                    return ActionResult::fail("Call action missing action id");
                };
                self.enter(target, cache, session, None).await
            }

            ActionKind::Compare => {
                let Some(action_id) = step.action_id else {
                    return ActionResult::fail("Compare action missing action id");
                };
                match cache.compare_action(action_id) {
                    Some(action) => self.compare.execute(action, session),
                    None => ActionResult::fail(format!(
                        "Compare action {} not found in cache",
                        action_id
                    )),
                }
            }

            ActionKind::Calculate => {
                let Some(action_id) = step.action_id else {
                    return ActionResult::fail("Calculate action missing action id");
                };
                match cache.calculate_action(action_id) {
                    Some(action) => self.calculate.execute(action, session),
                    None => ActionResult::fail(format!(
                        "Calculate action {} not found in cache",
                        action_id
                    )),
                }
            }

            ActionKind::DatabaseExecute => {
                let Some(action_id) = step.action_id else {
                    return ActionResult::fail("Database action missing action id");
                };
                match cache.database_action(action_id) {
                    Some(action) => self.database.execute(action, cache, session).await,
                    None => ActionResult::fail(format!(
                        "Database action {} not found in cache",
                        action_id
                    )),
                }
            }

            ActionKind::Dialog => {
                let Some(action_id) = step.action_id else {
                    return ActionResult::fail("Dialog action missing action id");
                };
                match cache.dialog_action(action_id) {
                    Some(action) => self.dialog.present(action, cache, session, current_sequence),
                    None => {
                        ActionResult::fail(format!("Dialog action {} not found in cache", action_id))
                    }
                }
            }
        }
    }
}

/// Binds caller parameters to fields by name: the field index is
/// case-insensitive while the caller's key is taken verbatim. Values convert
/// toward the field's declared type, tolerantly.
fn bind_parameters(parameters: Parameters, cache: &ModuleCache, session: &mut ExecutionSession) {
    for (name, value) in parameters {
        if let Some(field) = cache.field_by_name(&name) {
            let converted = value.coerce(field.field_type);
            session.set_field(field.id, Some(converted));
        }
    }
}

/// Resolves a branch label to the next step sequence.
///
/// Empty labels and `NEXT` advance by one, `PREV` steps back by one, and any
/// other label jumps to the step whose label name matches case-insensitively.
/// `None` is the no-such-step sentinel that ends execution. Commented steps
/// are not branch targets.
pub(crate) fn resolve_next(steps: &[ProcessStep], current: i32, label: Option<&str>) -> Option<i32> {
    let label = match label {
        None => return Some(current + 1),
        Some(l) if l.is_empty() => return Some(current + 1),
        Some(l) => l,
    };

    if label.eq_ignore_ascii_case("NEXT") {
        return Some(current + 1);
    }
    if label.eq_ignore_ascii_case("PREV") {
        return Some(current - 1);
    }

    steps
        .iter()
        .filter(|s| !s.commented)
        .find(|s| {
            s.label
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(label))
        })
        .map(|s| s.sequence)
}
