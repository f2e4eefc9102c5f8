//! Application layer: the engine facade and the session manager that binds
//! terminal devices to execution sessions.

mod dto;
mod engine;
mod session_manager;

pub use dto::{
    DeviceScreenResponse, DeviceStatusResponse, DeviceSummary, EngineHealth, SessionStatistics,
};
pub use engine::ExecutionEngine;
pub use session_manager::{DeviceSession, DeviceStatus, SessionError, SessionManager};
