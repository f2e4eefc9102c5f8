//! Read-mostly lookup store of loaded module definitions.

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::foundation::ModuleId;
use crate::domain::modules::{
    CalculateAction, CompareAction, DatabaseAction, DialogAction, Field, Module, ProcessModule,
    ScreenFormat,
};

/// Per-kind counts of loaded definitions, reported by the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCounts {
    pub modules: usize,
    pub processes: usize,
    pub compare_actions: usize,
    pub calculate_actions: usize,
    pub database_actions: usize,
    pub dialog_actions: usize,
    pub screen_formats: usize,
    pub fields: usize,
}

/// Typed collections of loaded definitions, one map per module kind.
///
/// A cache is populated by a loader, then published wholesale and treated as
/// read-only; a reload builds a fresh instance and swaps it in one step.
#[derive(Debug, Clone, Default)]
pub struct ModuleCache {
    modules: HashMap<ModuleId, Module>,
    processes: HashMap<ModuleId, ProcessModule>,
    compare_actions: HashMap<ModuleId, CompareAction>,
    calculate_actions: HashMap<ModuleId, CalculateAction>,
    database_actions: HashMap<ModuleId, DatabaseAction>,
    dialog_actions: HashMap<ModuleId, DialogAction>,
    screen_formats: HashMap<ModuleId, ScreenFormat>,
    fields: HashMap<ModuleId, Field>,
    /// Lowercased field name -> field id, for parameter binding.
    fields_by_name: HashMap<String, ModuleId>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: Module) {
        self.modules.insert(module.id, module);
    }

    pub fn add_process(&mut self, process: ProcessModule) {
        self.processes.insert(process.id, process);
    }

    pub fn add_compare_action(&mut self, action: CompareAction) {
        self.compare_actions.insert(action.id, action);
    }

    pub fn add_calculate_action(&mut self, action: CalculateAction) {
        self.calculate_actions.insert(action.id, action);
    }

    pub fn add_database_action(&mut self, action: DatabaseAction) {
        self.database_actions.insert(action.id, action);
    }

    pub fn add_dialog_action(&mut self, action: DialogAction) {
        self.dialog_actions.insert(action.id, action);
    }

    pub fn add_screen_format(&mut self, format: ScreenFormat) {
        self.screen_formats.insert(format.id, format);
    }

    /// Adds a field and indexes it by its envelope name.
    ///
    /// The envelope must already be in the cache for the name index to pick
    /// it up, matching loader insertion order (envelopes first).
    pub fn add_field(&mut self, field: Field) {
        if let Some(module) = self.modules.get(&field.id) {
            if !module.name.is_empty() {
                self.fields_by_name
                    .insert(module.name.to_lowercase(), field.id);
            }
        }
        self.fields.insert(field.id, field);
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn process(&self, id: ModuleId) -> Option<&ProcessModule> {
        self.processes.get(&id)
    }

    pub fn compare_action(&self, id: ModuleId) -> Option<&CompareAction> {
        self.compare_actions.get(&id)
    }

    pub fn calculate_action(&self, id: ModuleId) -> Option<&CalculateAction> {
        self.calculate_actions.get(&id)
    }

    pub fn database_action(&self, id: ModuleId) -> Option<&DatabaseAction> {
        self.database_actions.get(&id)
    }

    pub fn dialog_action(&self, id: ModuleId) -> Option<&DialogAction> {
        self.dialog_actions.get(&id)
    }

    pub fn screen_format(&self, id: ModuleId) -> Option<&ScreenFormat> {
        self.screen_formats.get(&id)
    }

    pub fn field(&self, id: ModuleId) -> Option<&Field> {
        self.fields.get(&id)
    }

    /// Resolves a field by its owning module's name, case-insensitively.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields_by_name
            .get(&name.to_lowercase())
            .and_then(|id| self.fields.get(id))
    }

    pub fn counts(&self) -> ModuleCounts {
        ModuleCounts {
            modules: self.modules.len(),
            processes: self.processes.len(),
            compare_actions: self.compare_actions.len(),
            calculate_actions: self.calculate_actions.len(),
            database_actions: self.database_actions.len(),
            dialog_actions: self.dialog_actions.len(),
            screen_formats: self.screen_formats.len(),
            fields: self.fields.len(),
        }
    }
}
