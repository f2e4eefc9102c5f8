//! DatabaseGateway port - interface for session-owned SQL connections.
//!
//! Each execution session exclusively owns at most one open connection at a
//! time; connections are never pooled or shared across sessions. The gateway
//! opens a connection against a configured target, and the connection
//! executes opaque statement text, returning at most one row of decoded
//! values.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::FieldValue;

/// One result row: column values in positional order, `None` for SQL NULL.
pub type SqlRow = Vec<Option<FieldValue>>;

/// Errors that can occur in gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("statement execution failed: {0}")]
    Execution(String),

    #[error("column decode failed: {0}")]
    Decode(String),
}

/// Port for opening dedicated database connections.
#[async_trait]
pub trait DatabaseGateway: Send + Sync {
    /// Opens a new connection against a configured connection target.
    async fn connect(&self, target: &str) -> Result<Box<dyn SessionConnection>, GatewayError>;
}

/// An open connection owned by a single execution session.
#[async_trait]
pub trait SessionConnection: Send {
    /// Executes the statement and reads at most one result row.
    ///
    /// Statements that produce no rows (or are not queries) return `None`.
    async fn fetch_row(&mut self, sql: &str) -> Result<Option<SqlRow>, GatewayError>;

    /// Closes the connection. Called once, before drop.
    async fn close(&mut self) -> Result<(), GatewayError>;
}
