//! In-Memory Database Gateway Adapter
//!
//! Records connections and executed statements, and serves scripted result
//! rows. Useful for testing the database executor and full process flows
//! without a live database.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::ports::{DatabaseGateway, GatewayError, SessionConnection, SqlRow};

#[derive(Debug, Default)]
struct GatewayState {
    rows: Mutex<VecDeque<SqlRow>>,
    executed: Mutex<Vec<String>>,
    connected_targets: Mutex<Vec<String>>,
    closes: AtomicUsize,
    fail_next_connect: Mutex<Option<String>>,
    fail_next_execution: Mutex<Option<String>>,
}

/// In-memory gateway whose connections all share the gateway's scripted
/// state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabaseGateway {
    state: Arc<GatewayState>,
}

impl InMemoryDatabaseGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a result row; each executed statement consumes one queued row,
    /// and an empty queue yields no row.
    pub fn push_row(&self, row: SqlRow) {
        self.state.rows.lock().unwrap().push_back(row);
    }

    /// Makes the next `connect` call fail with the given message.
    pub fn fail_next_connect(&self, message: impl Into<String>) {
        *self.state.fail_next_connect.lock().unwrap() = Some(message.into());
    }

    /// Makes the next executed statement fail with the given message.
    pub fn fail_next_execution(&self, message: impl Into<String>) {
        *self.state.fail_next_execution.lock().unwrap() = Some(message.into());
    }

    /// Every statement executed so far, after field substitution.
    pub fn executed_statements(&self) -> Vec<String> {
        self.state.executed.lock().unwrap().clone()
    }

    /// Connection targets opened so far.
    pub fn connected_targets(&self) -> Vec<String> {
        self.state.connected_targets.lock().unwrap().clone()
    }

    pub fn connect_count(&self) -> usize {
        self.state.connected_targets.lock().unwrap().len()
    }

    pub fn close_count(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseGateway for InMemoryDatabaseGateway {
    async fn connect(&self, target: &str) -> Result<Box<dyn SessionConnection>, GatewayError> {
        if let Some(message) = self.state.fail_next_connect.lock().unwrap().take() {
            return Err(GatewayError::Connection(message));
        }
        self.state
            .connected_targets
            .lock()
            .unwrap()
            .push(target.to_string());
        Ok(Box::new(InMemoryConnection {
            state: Arc::clone(&self.state),
        }))
    }
}

struct InMemoryConnection {
    state: Arc<GatewayState>,
}

#[async_trait]
impl SessionConnection for InMemoryConnection {
    async fn fetch_row(&mut self, sql: &str) -> Result<Option<SqlRow>, GatewayError> {
        if let Some(message) = self.state.fail_next_execution.lock().unwrap().take() {
            return Err(GatewayError::Execution(message));
        }
        self.state.executed.lock().unwrap().push(sql.to_string());
        Ok(self.state.rows.lock().unwrap().pop_front())
    }

    async fn close(&mut self) -> Result<(), GatewayError> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::FieldValue;

    #[tokio::test]
    async fn records_statements_and_serves_scripted_rows() {
        let gateway = InMemoryDatabaseGateway::new();
        gateway.push_row(vec![Some(FieldValue::Integer(1))]);

        let mut conn = gateway.connect("postgres://test").await.unwrap();
        let row = conn.fetch_row("SELECT 1").await.unwrap();
        assert_eq!(row, Some(vec![Some(FieldValue::Integer(1))]));

        let none = conn.fetch_row("SELECT 2").await.unwrap();
        assert!(none.is_none());

        assert_eq!(gateway.executed_statements(), vec!["SELECT 1", "SELECT 2"]);
        assert_eq!(gateway.connected_targets(), vec!["postgres://test"]);
    }

    #[tokio::test]
    async fn scripted_failures_surface_once() {
        let gateway = InMemoryDatabaseGateway::new();
        gateway.fail_next_connect("refused");
        assert!(gateway.connect("postgres://test").await.is_err());
        assert!(gateway.connect("postgres://test").await.is_ok());

        gateway.fail_next_execution("boom");
        let mut conn = gateway.connect("postgres://test").await.unwrap();
        assert!(conn.fetch_row("SELECT 1").await.is_err());
        assert!(conn.fetch_row("SELECT 1").await.is_ok());
    }

    #[tokio::test]
    async fn close_is_counted() {
        let gateway = InMemoryDatabaseGateway::new();
        let mut conn = gateway.connect("postgres://test").await.unwrap();
        conn.close().await.unwrap();
        assert_eq!(gateway.close_count(), 1);
    }
}
