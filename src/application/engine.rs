//! Execution engine facade: the published definition cache plus the step
//! interpreter, behind one handle the session manager and front ends share.

use std::sync::{Arc, RwLock};

use crate::config::EngineConfig;
use crate::domain::execution::{ActionResult, ExecutionSession, ModuleCache, ModuleCounts};
use crate::domain::executors::{Parameters, ProcessExecutor};
use crate::domain::foundation::{ApplicationId, ModuleId};
use crate::ports::{ApplicationLoader, DatabaseGateway, LoaderError};

/// Facade composing the cache, the process executor, and application
/// loading.
pub struct ExecutionEngine {
    loader: Arc<dyn ApplicationLoader>,
    executor: ProcessExecutor,
    /// Published wholesale: a reload builds a fresh cache and swaps the Arc
    /// in one step, so concurrent executions keep reading their snapshot.
    cache: RwLock<Arc<ModuleCache>>,
}

impl ExecutionEngine {
    pub fn new(
        config: &EngineConfig,
        loader: Arc<dyn ApplicationLoader>,
        gateway: Arc<dyn DatabaseGateway>,
    ) -> Self {
        Self {
            loader,
            executor: ProcessExecutor::new(config, gateway),
            cache: RwLock::new(Arc::new(ModuleCache::new())),
        }
    }

    /// Loads an application's definitions through the loader and publishes
    /// the resulting cache atomically.
    pub async fn load_application(&self, application_id: ApplicationId) -> Result<(), LoaderError> {
        let cache = self.loader.load_application(application_id).await?;
        let counts = cache.counts();
        *self.cache.write().unwrap() = Arc::new(cache);
        tracing::info!(
            application = %application_id,
            modules = counts.modules,
            processes = counts.processes,
            "application loaded"
        );
        Ok(())
    }

    /// The current cache snapshot. Executions hold one snapshot for their
    /// whole run; a concurrent reload does not affect them.
    pub fn cache(&self) -> Arc<ModuleCache> {
        Arc::clone(&self.cache.read().unwrap())
    }

    pub fn module_counts(&self) -> ModuleCounts {
        self.cache.read().unwrap().counts()
    }

    /// Runs a process module against an existing session.
    pub async fn execute_process(
        &self,
        process_id: ModuleId,
        session: &mut ExecutionSession,
        parameters: Option<Parameters>,
    ) -> ActionResult {
        let cache = self.cache();
        self.executor
            .execute(process_id, &cache, session, parameters)
            .await
    }

    /// Resumes a paused session with operator input.
    pub async fn resume_process(
        &self,
        session: &mut ExecutionSession,
        input: &str,
    ) -> ActionResult {
        let cache = self.cache();
        self.executor.resume(&cache, session, input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryApplicationLoader, InMemoryDatabaseGateway};
    use crate::domain::modules::{Module, ModuleKind, ProcessModule};

    fn engine_with_loader(loader: Arc<InMemoryApplicationLoader>) -> ExecutionEngine {
        ExecutionEngine::new(
            &EngineConfig::default(),
            loader,
            Arc::new(InMemoryDatabaseGateway::new()),
        )
    }

    #[tokio::test]
    async fn load_application_publishes_cache() {
        let loader = Arc::new(InMemoryApplicationLoader::new());
        let app = ApplicationId::new();
        let process_id = ModuleId::new();

        let mut cache = ModuleCache::new();
        cache.add_module(Module::new(process_id, app, ModuleKind::Process, "MAIN"));
        cache.add_process(ProcessModule::new(process_id, vec![]));
        loader.register(app, cache);

        let engine = engine_with_loader(loader);
        assert_eq!(engine.module_counts().processes, 0);

        engine.load_application(app).await.unwrap();
        assert_eq!(engine.module_counts().processes, 1);
        assert!(engine.cache().process(process_id).is_some());
    }

    #[tokio::test]
    async fn load_unknown_application_is_an_error() {
        let loader = Arc::new(InMemoryApplicationLoader::new());
        let engine = engine_with_loader(loader);
        assert!(engine.load_application(ApplicationId::new()).await.is_err());
    }

    #[tokio::test]
    async fn reload_replaces_cache_wholesale() {
        let loader = Arc::new(InMemoryApplicationLoader::new());
        let app = ApplicationId::new();
        let first = ModuleId::new();

        let mut cache = ModuleCache::new();
        cache.add_module(Module::new(first, app, ModuleKind::Process, "OLD"));
        cache.add_process(ProcessModule::new(first, vec![]));
        loader.register(app, cache);

        let engine = engine_with_loader(loader.clone());
        engine.load_application(app).await.unwrap();
        let snapshot = engine.cache();

        let second = ModuleId::new();
        let mut replacement = ModuleCache::new();
        replacement.add_module(Module::new(second, app, ModuleKind::Process, "NEW"));
        replacement.add_process(ProcessModule::new(second, vec![]));
        loader.register(app, replacement);
        engine.load_application(app).await.unwrap();

        // old snapshot still readable, new cache swapped in
        assert!(snapshot.process(first).is_some());
        assert!(engine.cache().process(first).is_none());
        assert!(engine.cache().process(second).is_some());
    }
}
