//! Response shapes consumed by thin front ends (HTTP or console).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::execution::ModuleCounts;
use crate::domain::foundation::{DeviceId, SessionId};
use crate::domain::rendering::Screen;

/// Screen-bearing response for connect and input operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceScreenResponse {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<Screen>,
    pub status: String,
    pub message: String,
}

/// Full device session status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatusResponse {
    pub device_id: DeviceId,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_id: Option<String>,
    pub connected_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub current_step: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<Screen>,
    pub is_paused: bool,
}

/// One row of the device listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub device_id: DeviceId,
    pub session_id: SessionId,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_id: Option<String>,
    pub connected_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Session-table statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatistics {
    pub total_devices: usize,
    pub active_devices: usize,
    pub total_execution_sessions: usize,
    pub devices_by_status: HashMap<String, usize>,
}

/// Engine health and statistics report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineHealth {
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub uptime_secs: i64,
    pub active_devices: usize,
    pub total_sessions: usize,
    pub module_counts: ModuleCounts,
    pub devices_by_status: HashMap<String, usize>,
}
