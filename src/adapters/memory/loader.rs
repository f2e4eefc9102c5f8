//! In-Memory Application Loader Adapter
//!
//! Serves prebuilt module caches by application id. The production loader
//! materializes definitions from durable storage; this adapter stands in for
//! it in tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::execution::ModuleCache;
use crate::domain::foundation::ApplicationId;
use crate::ports::{ApplicationLoader, LoaderError};

/// Loader returning caches registered up front.
#[derive(Debug, Default)]
pub struct InMemoryApplicationLoader {
    applications: RwLock<HashMap<ApplicationId, ModuleCache>>,
}

impl InMemoryApplicationLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) an application's definitions.
    pub fn register(&self, application_id: ApplicationId, cache: ModuleCache) {
        self.applications
            .write()
            .unwrap()
            .insert(application_id, cache);
    }
}

#[async_trait]
impl ApplicationLoader for InMemoryApplicationLoader {
    async fn load_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<ModuleCache, LoaderError> {
        self.applications
            .read()
            .unwrap()
            .get(&application_id)
            .cloned()
            .ok_or(LoaderError::ApplicationNotFound(application_id))
    }
}
