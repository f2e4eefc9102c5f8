//! Session manager: owns the table of live terminal sessions, binds each
//! device to an execution session, routes resume-with-input calls, and
//! expires idle sessions.
//!
//! The interpreter mutates session state with no internal locking, so each
//! execution session sits behind its own async mutex: requests for one
//! device serialize at this boundary while distinct devices execute
//! concurrently.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use super::dto::{
    DeviceScreenResponse, DeviceStatusResponse, DeviceSummary, EngineHealth, SessionStatistics,
};
use super::engine::ExecutionEngine;
use crate::config::EngineConfig;
use crate::domain::execution::{ActionResult, ExecutionSession};
use crate::domain::foundation::{DeviceId, ModuleId, SessionId};
use crate::domain::rendering::Screen;
use crate::ports::Clock;

/// Lifecycle state of a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceStatus {
    /// Registered, no process awaiting input.
    Connected,
    /// An operator is signed on.
    Active,
    /// A process is paused awaiting terminal input.
    Idle,
    Disconnected,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Connected => "CONNECTED",
            DeviceStatus::Active => "ACTIVE",
            DeviceStatus::Idle => "IDLE",
            DeviceStatus::Disconnected => "DISCONNECTED",
        }
    }

    fn counts_as_active(&self) -> bool {
        matches!(
            self,
            DeviceStatus::Connected | DeviceStatus::Active | DeviceStatus::Idle
        )
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one registered terminal.
#[derive(Debug, Clone)]
pub struct DeviceSession {
    pub device_id: DeviceId,
    pub session_id: SessionId,
    pub current_user_id: Option<String>,
    pub connected_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub status: DeviceStatus,
    pub root_process_id: ModuleId,
    pub current_step: i32,
    pub current_screen: Option<Screen>,
}

/// Errors surfaced to the session-facing operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("device {0} not registered")]
    DeviceNotRegistered(DeviceId),

    #[error("no execution session for device {0}")]
    SessionMissing(DeviceId),

    #[error("device {0} is not paused, cannot send input")]
    DeviceNotPaused(DeviceId),

    #[error("process failed: {0}")]
    ProcessFailed(String),
}

/// Manages all active device sessions in memory.
pub struct SessionManager {
    engine: Arc<ExecutionEngine>,
    clock: Arc<dyn Clock>,
    session_timeout: chrono::Duration,
    cleanup_interval: std::time::Duration,
    started_at: DateTime<Utc>,
    devices: RwLock<HashMap<DeviceId, DeviceSession>>,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<ExecutionSession>>>>,
    /// Most recent execution result per device, kept for status queries.
    last_results: RwLock<HashMap<DeviceId, ActionResult>>,
}

impl SessionManager {
    pub fn new(engine: Arc<ExecutionEngine>, clock: Arc<dyn Clock>, config: &EngineConfig) -> Self {
        let started_at = clock.now();
        Self {
            engine,
            clock,
            session_timeout: config.session_timeout(),
            cleanup_interval: config.cleanup_interval(),
            started_at,
            devices: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            last_results: RwLock::new(HashMap::new()),
        }
    }

    // ------------------------------------------------------------------
    // Device lifecycle
    // ------------------------------------------------------------------

    /// Registers a device and creates its execution session.
    pub async fn register_device(
        &self,
        device_id: DeviceId,
        root_process_id: ModuleId,
    ) -> DeviceSession {
        let now = self.clock.now();
        let execution_session =
            ExecutionSession::new(None, Some(device_id.clone()), now);
        let session_id = execution_session.session_id();

        let device = DeviceSession {
            device_id: device_id.clone(),
            session_id,
            current_user_id: None,
            connected_at: now,
            last_activity: now,
            status: DeviceStatus::Connected,
            root_process_id,
            current_step: 1,
            current_screen: None,
        };

        self.sessions
            .write()
            .await
            .insert(session_id, Arc::new(Mutex::new(execution_session)));
        self.devices
            .write()
            .await
            .insert(device_id.clone(), device.clone());

        tracing::info!(device = %device_id, session = %session_id, "device registered");
        device
    }

    /// Starts the device's registered root process (typically the login
    /// flow). The process usually stops at its first dialog, leaving the
    /// device idle with a screen to display.
    pub async fn start_device_process(
        &self,
        device_id: &DeviceId,
    ) -> Result<ActionResult, SessionError> {
        let root_process_id = self
            .device_snapshot(device_id)
            .await
            .ok_or_else(|| SessionError::DeviceNotRegistered(device_id.clone()))?
            .root_process_id;
        let session = self
            .execution_session(device_id)
            .await
            .ok_or_else(|| SessionError::SessionMissing(device_id.clone()))?;

        let mut guard = session.lock().await;
        let result = self
            .engine
            .execute_process(root_process_id, &mut guard, None)
            .await;
        let paused = guard.is_paused();
        let screen = guard.pause_marker().map(|m| m.screen.clone());
        let paused_step = guard.pause_marker().map(|m| m.step);
        drop(guard);

        self.apply_execution_outcome(device_id, &result, paused, screen, paused_step)
            .await;
        Ok(result)
    }

    /// Resumes a paused device process with operator input.
    pub async fn resume_device_process(
        &self,
        device_id: &DeviceId,
        input: &str,
    ) -> Result<ActionResult, SessionError> {
        let session = self
            .execution_session(device_id)
            .await
            .ok_or_else(|| SessionError::SessionMissing(device_id.clone()))?;

        let mut guard = session.lock().await;
        if !guard.is_paused() {
            return Err(SessionError::DeviceNotPaused(device_id.clone()));
        }
        let result = self.engine.resume_process(&mut guard, input).await;
        let paused = guard.is_paused();
        let screen = guard.pause_marker().map(|m| m.screen.clone());
        let paused_step = guard.pause_marker().map(|m| m.step);
        drop(guard);

        self.apply_execution_outcome(device_id, &result, paused, screen, paused_step)
            .await;
        Ok(result)
    }

    /// Binds an operator to a device after a successful login.
    pub async fn set_device_user(&self, device_id: &DeviceId, user_id: impl Into<String>) {
        let user_id = user_id.into();
        let now = self.clock.now();
        if let Some(device) = self.devices.write().await.get_mut(device_id) {
            device.current_user_id = Some(user_id.clone());
            device.status = DeviceStatus::Active;
            device.last_activity = now;
        }
        if let Some(session) = self.execution_session(device_id).await {
            session.lock().await.set_user_id(Some(user_id));
        }
    }

    /// Unbinds the operator (logout).
    pub async fn clear_device_user(&self, device_id: &DeviceId) {
        let now = self.clock.now();
        if let Some(device) = self.devices.write().await.get_mut(device_id) {
            device.current_user_id = None;
            device.status = DeviceStatus::Connected;
            device.last_activity = now;
        }
        if let Some(session) = self.execution_session(device_id).await {
            session.lock().await.set_user_id(None);
        }
    }

    pub async fn disconnect_device(&self, device_id: &DeviceId) {
        let now = self.clock.now();
        if let Some(device) = self.devices.write().await.get_mut(device_id) {
            device.status = DeviceStatus::Disconnected;
            device.last_activity = now;
        }
    }

    /// Removes a device and releases its session resources.
    pub async fn remove_device(&self, device_id: &DeviceId) -> bool {
        let Some(device) = self.devices.write().await.remove(device_id) else {
            return false;
        };
        let session = self.sessions.write().await.remove(&device.session_id);
        self.last_results.write().await.remove(device_id);

        if let Some(session) = session {
            session.lock().await.close_connection().await;
        }
        true
    }

    pub async fn update_device_activity(&self, device_id: &DeviceId) {
        let now = self.clock.now();
        if let Some(device) = self.devices.write().await.get_mut(device_id) {
            device.last_activity = now;
        }
    }

    // ------------------------------------------------------------------
    // Session-facing operations
    // ------------------------------------------------------------------

    /// Connects a terminal: returns its current screen and status.
    pub async fn connect(&self, device_id: &DeviceId) -> Result<DeviceScreenResponse, SessionError> {
        let device = self
            .device_snapshot(device_id)
            .await
            .ok_or_else(|| SessionError::DeviceNotRegistered(device_id.clone()))?;

        self.update_device_activity(device_id).await;

        Ok(DeviceScreenResponse {
            session_id: device.session_id,
            screen: device.current_screen,
            status: device.status.as_str().to_string(),
            message: "Connected successfully".to_string(),
        })
    }

    /// Delivers operator input to a paused device process.
    pub async fn send_input(
        &self,
        device_id: &DeviceId,
        input: &str,
    ) -> Result<DeviceScreenResponse, SessionError> {
        let device = self
            .device_snapshot(device_id)
            .await
            .ok_or_else(|| SessionError::DeviceNotRegistered(device_id.clone()))?;

        let result = self.resume_device_process(device_id, input).await?;
        if result.failed() {
            return Err(SessionError::ProcessFailed(result.message.clone()));
        }

        let updated = self.device_snapshot(device_id).await;
        let (screen, paused) = match &updated {
            Some(d) => (d.current_screen.clone(), d.status == DeviceStatus::Idle),
            None => (None, false),
        };

        Ok(DeviceScreenResponse {
            session_id: device.session_id,
            screen,
            status: if paused { "paused" } else { "completed" }.to_string(),
            message: result.message,
        })
    }

    /// Reports a device's full status. Repeated calls without an intervening
    /// input return identical screens.
    pub async fn status(&self, device_id: &DeviceId) -> Result<DeviceStatusResponse, SessionError> {
        let device = self
            .device_snapshot(device_id)
            .await
            .ok_or_else(|| SessionError::DeviceNotRegistered(device_id.clone()))?;

        let is_paused = match self.execution_session(device_id).await {
            Some(session) => session.lock().await.is_paused(),
            None => false,
        };

        Ok(DeviceStatusResponse {
            device_id: device.device_id,
            status: device.status.as_str().to_string(),
            current_user_id: device.current_user_id,
            connected_at: device.connected_at,
            last_activity: device.last_activity,
            current_step: device.current_step,
            screen: device.current_screen,
            is_paused,
        })
    }

    pub async fn list_devices(&self) -> Vec<DeviceSummary> {
        self.devices
            .read()
            .await
            .values()
            .map(summary)
            .collect()
    }

    pub async fn devices_by_user(&self, user_id: &str) -> Vec<DeviceSummary> {
        self.devices
            .read()
            .await
            .values()
            .filter(|d| d.current_user_id.as_deref() == Some(user_id))
            .map(summary)
            .collect()
    }

    pub async fn last_result(&self, device_id: &DeviceId) -> Option<ActionResult> {
        self.last_results.read().await.get(device_id).cloned()
    }

    pub async fn statistics(&self) -> SessionStatistics {
        let devices = self.devices.read().await;
        let mut by_status: HashMap<String, usize> = HashMap::new();
        let mut active = 0;
        for device in devices.values() {
            *by_status.entry(device.status.as_str().to_string()).or_default() += 1;
            if device.status.counts_as_active() {
                active += 1;
            }
        }

        SessionStatistics {
            total_devices: devices.len(),
            active_devices: active,
            total_execution_sessions: self.sessions.read().await.len(),
            devices_by_status: by_status,
        }
    }

    pub async fn health(&self) -> EngineHealth {
        let stats = self.statistics().await;
        EngineHealth {
            status: "Healthy".to_string(),
            start_time: self.started_at,
            uptime_secs: (self.clock.now() - self.started_at).num_seconds(),
            active_devices: stats.active_devices,
            total_sessions: stats.total_execution_sessions,
            module_counts: self.engine.module_counts(),
            devices_by_status: stats.devices_by_status,
        }
    }

    // ------------------------------------------------------------------
    // Expiry
    // ------------------------------------------------------------------

    /// Evicts sessions idle beyond the configured timeout; returns the
    /// removed device ids.
    pub async fn expire_idle_sessions(&self) -> Vec<DeviceId> {
        let now = self.clock.now();
        let expired: Vec<DeviceId> = self
            .devices
            .read()
            .await
            .values()
            .filter(|d| now - d.last_activity > self.session_timeout)
            .map(|d| d.device_id.clone())
            .collect();

        for device_id in &expired {
            tracing::info!(device = %device_id, "cleaning up expired session");
            self.remove_device(device_id).await;
        }
        expired
    }

    /// Starts the background sweep evicting idle sessions.
    pub fn spawn_cleanup(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let manager = self;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(manager.cleanup_interval);
            interval.tick().await; // the first tick fires immediately
            loop {
                interval.tick().await;
                manager.expire_idle_sessions().await;
            }
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn device_snapshot(&self, device_id: &DeviceId) -> Option<DeviceSession> {
        self.devices.read().await.get(device_id).cloned()
    }

    async fn execution_session(&self, device_id: &DeviceId) -> Option<Arc<Mutex<ExecutionSession>>> {
        let session_id = self.devices.read().await.get(device_id)?.session_id;
        self.sessions.read().await.get(&session_id).cloned()
    }

    async fn apply_execution_outcome(
        &self,
        device_id: &DeviceId,
        result: &ActionResult,
        paused: bool,
        screen: Option<Screen>,
        paused_step: Option<i32>,
    ) {
        let now = self.clock.now();
        if let Some(device) = self.devices.write().await.get_mut(device_id) {
            if paused {
                device.status = DeviceStatus::Idle;
                device.current_screen = screen;
                if let Some(step) = paused_step {
                    device.current_step = step;
                }
            } else {
                device.status = DeviceStatus::Connected;
                device.current_screen = None;
            }
            device.last_activity = now;
        }

        self.last_results
            .write()
            .await
            .insert(device_id.clone(), result.clone());
    }
}

fn summary(device: &DeviceSession) -> DeviceSummary {
    DeviceSummary {
        device_id: device.device_id.clone(),
        session_id: device.session_id,
        status: device.status.as_str().to_string(),
        current_user_id: device.current_user_id.clone(),
        connected_at: device.connected_at,
        last_activity: device.last_activity,
    }
}
