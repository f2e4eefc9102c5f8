//! Per-session runtime state: field store, call stack, pause marker, and the
//! session-owned database connection.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::{DeviceId, FieldValue, ModuleId, SessionId};
use crate::domain::rendering::Screen;
use crate::ports::SessionConnection;

/// One nested process invocation on a session's call stack.
#[derive(Debug, Clone)]
pub struct ExecutionFrame {
    pub process_id: ModuleId,
    pub process_name: String,
    pub entered_at: DateTime<Utc>,
    /// Names of the parameters bound on entry.
    pub parameters: Vec<String>,
}

impl ExecutionFrame {
    pub fn new(process_id: ModuleId, process_name: impl Into<String>) -> Self {
        Self {
            process_id,
            process_name: process_name.into(),
            entered_at: Utc::now(),
            parameters: Vec::new(),
        }
    }
}

/// Marker recorded when a dialog suspends execution. The pausing dialog,
/// step, and screen are set and cleared together.
#[derive(Debug, Clone)]
pub struct PauseMarker {
    /// The dialog action that paused execution.
    pub dialog_id: ModuleId,
    /// Sequence of the step that paused, within the current frame's process.
    pub step: i32,
    /// The screen awaiting operator input.
    pub screen: Screen,
}

/// One actor's runtime state. The interpreter mutates this freely with no
/// internal locking; callers must never run two executions against the same
/// session at once.
pub struct ExecutionSession {
    session_id: SessionId,
    started_at: DateTime<Utc>,
    user_id: Option<String>,
    device_id: Option<DeviceId>,
    current_database: Option<String>,
    pause: Option<PauseMarker>,
    fields: HashMap<ModuleId, FieldValue>,
    stack: Vec<ExecutionFrame>,
    connection: Option<Box<dyn SessionConnection>>,
}

impl ExecutionSession {
    pub fn new(
        user_id: Option<String>,
        device_id: Option<DeviceId>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: SessionId::new(),
            started_at,
            user_id,
            device_id,
            current_database: None,
            pause: None,
            fields: HashMap::new(),
            stack: Vec::new(),
            connection: None,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn set_user_id(&mut self, user_id: Option<String>) {
        self.user_id = user_id;
    }

    pub fn device_id(&self) -> Option<&DeviceId> {
        self.device_id.as_ref()
    }

    // ------------------------------------------------------------------
    // Field store
    // ------------------------------------------------------------------

    /// Stores a field value; `None` clears the field back to null.
    pub fn set_field(&mut self, field_id: ModuleId, value: Option<FieldValue>) {
        match value {
            Some(v) => {
                self.fields.insert(field_id, v);
            }
            None => {
                self.fields.remove(&field_id);
            }
        }
    }

    pub fn field(&self, field_id: ModuleId) -> Option<&FieldValue> {
        self.fields.get(&field_id)
    }

    /// Renders a field as display text; unset fields render empty.
    pub fn render_field(&self, field_id: ModuleId) -> String {
        self.fields
            .get(&field_id)
            .map(FieldValue::render)
            .unwrap_or_default()
    }

    pub fn has_field(&self, field_id: ModuleId) -> bool {
        self.fields.contains_key(&field_id)
    }

    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    pub fn fields(&self) -> &HashMap<ModuleId, FieldValue> {
        &self.fields
    }

    // ------------------------------------------------------------------
    // Call stack
    // ------------------------------------------------------------------

    pub fn push_frame(&mut self, frame: ExecutionFrame) {
        self.stack.push(frame);
    }

    pub fn pop_frame(&mut self) -> Option<ExecutionFrame> {
        self.stack.pop()
    }

    pub fn current_frame(&self) -> Option<&ExecutionFrame> {
        self.stack.last()
    }

    pub fn call_depth(&self) -> usize {
        self.stack.len()
    }

    // ------------------------------------------------------------------
    // Pause / resume
    // ------------------------------------------------------------------

    pub fn pause(&mut self, marker: PauseMarker) {
        self.pause = Some(marker);
    }

    /// Clears the pause marker once input has been delivered.
    pub fn resume(&mut self) {
        self.pause = None;
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    pub fn pause_marker(&self) -> Option<&PauseMarker> {
        self.pause.as_ref()
    }

    // ------------------------------------------------------------------
    // Database connection
    // ------------------------------------------------------------------

    pub fn current_database(&self) -> Option<&str> {
        self.current_database.as_deref()
    }

    /// Records a freshly opened connection as the session's owned connection.
    pub fn bind_connection(&mut self, database: impl Into<String>, conn: Box<dyn SessionConnection>) {
        self.current_database = Some(database.into());
        self.connection = Some(conn);
    }

    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connection_mut(&mut self) -> Option<&mut Box<dyn SessionConnection>> {
        self.connection.as_mut()
    }

    /// Closes and drops the owned connection, if any.
    pub async fn close_connection(&mut self) {
        if let Some(mut conn) = self.connection.take() {
            if let Err(e) = conn.close().await {
                tracing::warn!(session = %self.session_id, error = %e, "failed to close session connection");
            }
            self.current_database = None;
        }
    }
}

impl fmt::Debug for ExecutionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionSession")
            .field("session_id", &self.session_id)
            .field("device_id", &self.device_id)
            .field("user_id", &self.user_id)
            .field("current_database", &self.current_database)
            .field("paused", &self.pause.is_some())
            .field("call_depth", &self.stack.len())
            .field("fields", &self.fields.len())
            .finish()
    }
}
