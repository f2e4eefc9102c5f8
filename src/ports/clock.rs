//! Clock port - injected time source.
//!
//! Session expiry decisions go through this trait rather than ambient time
//! so the session manager can be constructed per test with a manual clock.

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
