//! Engine configuration

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use super::error::{ConfigError, ValidationError};

/// Engine configuration
///
/// Named database connection targets plus the interpreter's safety limits
/// and the session manager's expiry settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Named database connection targets (database name -> connection URL)
    #[serde(default)]
    pub databases: BTreeMap<String, String>,

    /// Database used when a statement carries no CONNECT directive
    #[serde(default = "default_database")]
    pub default_database: String,

    /// Maximum nested process invocations per session
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,

    /// Maximum step-loop iterations per process invocation
    #[serde(default = "default_max_step_iterations")]
    pub max_step_iterations: usize,

    /// Idle session expiry in seconds
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// Interval between idle-session sweeps in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file if present, then environment variables with the
    /// `TASKLINE` prefix and `__` as the nesting separator, e.g.
    /// `TASKLINE__DEFAULT_DATABASE=WMS`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TASKLINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Resolve the connection target for a named database
    pub fn database_target(&self, name: &str) -> Option<&str> {
        self.databases.get(name).map(String::as_str)
    }

    /// Resolve the default database: the configured name when registered,
    /// otherwise the first registered target
    pub fn default_target(&self) -> Option<(&str, &str)> {
        if let Some(target) = self.databases.get(&self.default_database) {
            return Some((self.default_database.as_str(), target.as_str()));
        }
        self.databases
            .iter()
            .next()
            .map(|(name, target)| (name.as_str(), target.as_str()))
    }

    /// Idle session expiry as a chrono duration
    pub fn session_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_timeout_secs as i64)
    }

    /// Cleanup sweep interval as a std duration
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_database.is_empty() {
            return Err(ValidationError::MissingRequired("default_database"));
        }
        if self.max_call_depth == 0 {
            return Err(ValidationError::InvalidCallDepth);
        }
        if self.max_step_iterations == 0 {
            return Err(ValidationError::InvalidIterationLimit);
        }
        if self.session_timeout_secs == 0 {
            return Err(ValidationError::InvalidSessionTimeout);
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ValidationError::InvalidCleanupInterval);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            databases: BTreeMap::new(),
            default_database: default_database(),
            max_call_depth: default_max_call_depth(),
            max_step_iterations: default_max_step_iterations(),
            session_timeout_secs: default_session_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

fn default_database() -> String {
    "WMS".to_string()
}

fn default_max_call_depth() -> usize {
    20
}

fn default_max_step_iterations() -> usize {
    10_000
}

fn default_session_timeout() -> u64 {
    8 * 60 * 60
}

fn default_cleanup_interval() -> u64 {
    5 * 60
}
