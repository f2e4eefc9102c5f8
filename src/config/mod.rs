//! Engine configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `TASKLINE_` prefix and nested values use double underscores as
//! separators.

mod engine;
mod error;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
