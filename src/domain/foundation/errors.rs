//! Error types for the domain layer.

use thiserror::Error;

use super::ModuleId;

/// Errors raised when validating loaded definitions.
///
/// Loaders are expected to reject definitions that break these invariants
/// before they reach the cache; the interpreter assumes they hold.
#[derive(Debug, Clone, Error)]
pub enum DefinitionError {
    #[error("process {process}: duplicate step sequence {sequence}")]
    DuplicateSequence { process: ModuleId, sequence: i32 },

    #[error("process {process}: duplicate step label '{label}'")]
    DuplicateLabel { process: ModuleId, label: String },
}
