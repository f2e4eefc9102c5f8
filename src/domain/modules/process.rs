//! Process definitions: ordered steps with branching labels.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::{DefinitionError, ModuleId};

/// The action a process step performs.
///
/// A closed set: the interpreter dispatches by variant, so an unknown action
/// is unrepresentable once a definition has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Call,
    ReturnPass,
    ReturnFail,
    DatabaseExecute,
    Dialog,
    Calculate,
    Compare,
}

/// One instruction in a process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessStep {
    pub id: ModuleId,
    /// Unique within the owning process.
    pub sequence: i32,
    /// Optional jump target name, unique within the owning process.
    pub label: Option<String>,
    pub action: ActionKind,
    /// Target module for every action except `ReturnPass`/`ReturnFail`.
    pub action_id: Option<ModuleId>,
    pub pass_label: Option<String>,
    pub fail_label: Option<String>,
    pub commented: bool,
    pub comment: Option<String>,
}

impl ProcessStep {
    pub fn new(sequence: i32, action: ActionKind) -> Self {
        Self {
            id: ModuleId::new(),
            sequence,
            label: None,
            action,
            action_id: None,
            pass_label: None,
            fail_label: None,
            commented: false,
            comment: None,
        }
    }

    pub fn with_action_id(mut self, action_id: ModuleId) -> Self {
        self.action_id = Some(action_id);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_pass_label(mut self, label: impl Into<String>) -> Self {
        self.pass_label = Some(label.into());
        self
    }

    pub fn with_fail_label(mut self, label: impl Into<String>) -> Self {
        self.fail_label = Some(label.into());
        self
    }

    pub fn commented(mut self) -> Self {
        self.commented = true;
        self
    }
}

/// An executable workflow: an ordered list of steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessModule {
    pub id: ModuleId,
    pub subtype: Option<String>,
    pub remote: bool,
    pub dynamic_call: bool,
    pub comment: Option<String>,
    pub steps: Vec<ProcessStep>,
}

impl ProcessModule {
    pub fn new(id: ModuleId, steps: Vec<ProcessStep>) -> Self {
        Self {
            id,
            subtype: None,
            remote: false,
            dynamic_call: false,
            comment: None,
            steps,
        }
    }

    /// Looks up the step carrying exactly this sequence number.
    pub fn step_at(&self, sequence: i32) -> Option<&ProcessStep> {
        self.steps.iter().find(|s| s.sequence == sequence)
    }

    /// Checks the loader-level invariants: step sequences and label names are
    /// unique within the process.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let mut sequences = HashSet::new();
        let mut labels = HashSet::new();
        for step in &self.steps {
            if !sequences.insert(step.sequence) {
                return Err(DefinitionError::DuplicateSequence {
                    process: self.id,
                    sequence: step.sequence,
                });
            }
            if let Some(label) = &step.label {
                if !labels.insert(label.to_lowercase()) {
                    return Err(DefinitionError::DuplicateLabel {
                        process: self.id,
                        label: label.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
