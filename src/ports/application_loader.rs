//! ApplicationLoader port - interface to the external definition loader.
//!
//! The durable storage schema and its loader live outside this crate; the
//! engine only requires that, given an application identifier, a fully
//! materialized `ModuleCache` comes back. There is no partial or incremental
//! load: the engine publishes the returned cache wholesale.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::execution::ModuleCache;
use crate::domain::foundation::ApplicationId;

/// Errors that can occur while loading an application's definitions.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Port for materializing every module of an application into a cache.
#[async_trait]
pub trait ApplicationLoader: Send + Sync {
    /// Loads every module and its specialized payload for the application.
    async fn load_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<ModuleCache, LoaderError>;
}
