//! Database statement execution with field substitution.

use std::sync::Arc;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::domain::execution::{ActionResult, ExecutionSession, ModuleCache};
use crate::domain::foundation::{FieldType, FieldValue, ModuleId};
use crate::domain::modules::DatabaseAction;
use crate::domain::parsing::{parse_connect, parse_returns, strip_returns, substitute_fields};
use crate::ports::{DatabaseGateway, GatewayError};

#[derive(Debug, Error)]
enum DatabaseExecError {
    #[error("no connection target configured for database: {0}")]
    UnknownDatabase(String),

    #[error("no database connection available")]
    NoConnectionAvailable,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Executes database actions against the session's owned connection.
///
/// Statement processing order: extract and strip the RETURNS clause, honor a
/// leading CONNECT directive (switching the session connection), substitute
/// field placeholders, execute, then map the first result row positionally
/// onto the RETURNS fields. Every failure becomes a Fail result; nothing
/// propagates past this executor.
pub struct DatabaseExecutor {
    config: EngineConfig,
    gateway: Arc<dyn DatabaseGateway>,
}

impl DatabaseExecutor {
    pub fn new(config: &EngineConfig, gateway: Arc<dyn DatabaseGateway>) -> Self {
        Self {
            config: config.clone(),
            gateway,
        }
    }

    pub async fn execute(
        &self,
        action: &DatabaseAction,
        cache: &ModuleCache,
        session: &mut ExecutionSession,
    ) -> ActionResult {
        match self.run(action, cache, session).await {
            Ok(result) => result,
            Err(e) => ActionResult::fail_with_cause(format!("Database execution failed: {}", e), e),
        }
    }

    async fn run(
        &self,
        action: &DatabaseAction,
        cache: &ModuleCache,
        session: &mut ExecutionSession,
    ) -> Result<ActionResult, DatabaseExecError> {
        let return_fields = parse_returns(&action.statement);
        let clean = strip_returns(&action.statement);

        let sql = if let Some((database, rest)) = parse_connect(&clean) {
            if session.current_database() != Some(database.as_str()) {
                session.close_connection().await;

                let target = self
                    .config
                    .database_target(&database)
                    .ok_or_else(|| DatabaseExecError::UnknownDatabase(database.clone()))?;
                let connection = self.gateway.connect(target).await?;
                session.bind_connection(database.clone(), connection);
            }

            if rest.is_empty() {
                return Ok(ActionResult::pass(format!(
                    "Connected to database: {}",
                    database
                )));
            }
            rest
        } else {
            if !session.has_connection() {
                let (database, target) = self
                    .config
                    .default_target()
                    .map(|(name, target)| (name.to_string(), target.to_string()))
                    .ok_or(DatabaseExecError::NoConnectionAvailable)?;
                let connection = self.gateway.connect(&target).await?;
                session.bind_connection(database, connection);
            }
            clean
        };

        let substituted = substitute_fields(&sql, |field_id| format_field(field_id, cache, session));
        tracing::debug!(
            database = session.current_database().unwrap_or_default(),
            statement = %substituted,
            "executing statement"
        );

        let database = session.current_database().unwrap_or_default().to_string();
        let connection = session
            .connection_mut()
            .ok_or(DatabaseExecError::NoConnectionAvailable)?;
        let row = connection.fetch_row(&substituted).await?;

        let mut result =
            ActionResult::pass(format!("Database execution completed on {}", database));

        if let Some(row) = row {
            for (field_id, column) in return_fields.iter().zip(row.into_iter()) {
                session.set_field(*field_id, column.clone());
                result.returned_fields.insert(*field_id, column);
            }
        }

        Ok(result)
    }
}

/// Renders a field's current value as a SQL literal typed by its declaration:
/// quoted strings with doubled embedded quotes, bare numbers, TRUE/FALSE
/// tokens, quoted fixed-format timestamps, NULL when unset. A field missing
/// from the cache is formatted as a string.
fn format_field(field_id: ModuleId, cache: &ModuleCache, session: &ExecutionSession) -> String {
    let Some(value) = session.field(field_id) else {
        return "NULL".to_string();
    };

    match cache.field(field_id).map(|f| f.field_type) {
        Some(FieldType::Integer) => value.render(),
        Some(FieldType::Boolean) => match value.as_boolean() {
            Some(true) => "TRUE".to_string(),
            Some(false) => "FALSE".to_string(),
            None => quote(&value.render()),
        },
        Some(FieldType::DateTime) => match value {
            FieldValue::Timestamp(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S")),
            other => quote(&other.render()),
        },
        Some(FieldType::Text) | None => quote(&value.render()),
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDatabaseGateway;
    use crate::domain::foundation::{ApplicationId, DeviceId};
    use crate::domain::modules::{Field, Module, ModuleKind};
    use crate::domain::parsing::field_token;
    use chrono::{TimeZone, Utc};

    fn session() -> ExecutionSession {
        ExecutionSession::new(None, Some(DeviceId::new("T-1")), Utc::now())
    }

    fn config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config
            .databases
            .insert("WMS".to_string(), "postgres://wms".to_string());
        config
            .databases
            .insert("ARCHIVE".to_string(), "postgres://archive".to_string());
        config
    }

    fn cache_with_typed_field(name: &str, field_type: FieldType) -> (ModuleCache, ModuleId) {
        let mut cache = ModuleCache::new();
        let id = ModuleId::new();
        cache.add_module(Module::new(id, ApplicationId::new(), ModuleKind::Field, name));
        cache.add_field(Field::new(id, field_type));
        (cache, id)
    }

    #[tokio::test]
    async fn bare_connect_switches_database_without_executing() {
        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        let executor = DatabaseExecutor::new(&config(), gateway.clone());
        let mut s = session();
        let action = DatabaseAction::new(ModuleId::new(), "CONNECT ARCHIVE;");

        let result = executor.execute(&action, &ModuleCache::new(), &mut s).await;

        assert!(result.passed());
        assert!(result.message.contains("ARCHIVE"));
        assert_eq!(s.current_database(), Some("ARCHIVE"));
        assert_eq!(gateway.connect_count(), 1);
        assert!(gateway.executed_statements().is_empty());
    }

    #[tokio::test]
    async fn connect_to_same_database_reuses_connection() {
        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        let executor = DatabaseExecutor::new(&config(), gateway.clone());
        let mut s = session();

        let action = DatabaseAction::new(ModuleId::new(), "CONNECT WMS;");
        executor.execute(&action, &ModuleCache::new(), &mut s).await;
        executor.execute(&action, &ModuleCache::new(), &mut s).await;

        assert_eq!(gateway.connect_count(), 1);
    }

    #[tokio::test]
    async fn connect_to_unknown_database_fails() {
        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        let executor = DatabaseExecutor::new(&config(), gateway);
        let mut s = session();
        let action = DatabaseAction::new(ModuleId::new(), "CONNECT NOWHERE; SELECT 1");

        let result = executor.execute(&action, &ModuleCache::new(), &mut s).await;

        assert!(result.failed());
        assert!(result.message.contains("NOWHERE"));
    }

    #[tokio::test]
    async fn default_database_opens_when_no_connect_directive() {
        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        let executor = DatabaseExecutor::new(&config(), gateway.clone());
        let mut s = session();
        let action = DatabaseAction::new(ModuleId::new(), "SELECT 1");

        let result = executor.execute(&action, &ModuleCache::new(), &mut s).await;

        assert!(result.passed());
        assert_eq!(s.current_database(), Some("WMS"));
        assert_eq!(gateway.executed_statements(), vec!["SELECT 1".to_string()]);
    }

    #[tokio::test]
    async fn no_databases_configured_fails() {
        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        let executor = DatabaseExecutor::new(&EngineConfig::default(), gateway);
        let mut s = session();
        let action = DatabaseAction::new(ModuleId::new(), "SELECT 1");

        let result = executor.execute(&action, &ModuleCache::new(), &mut s).await;
        assert!(result.failed());
        assert!(result.message.contains("no database connection available"));
    }

    #[tokio::test]
    async fn substitution_is_typed_by_field_declaration() {
        let (mut cache, text_field) = cache_with_typed_field("Sku", FieldType::Text);
        let int_id = ModuleId::new();
        cache.add_module(Module::new(
            int_id,
            ApplicationId::new(),
            ModuleKind::Field,
            "Qty",
        ));
        cache.add_field(Field::new(int_id, FieldType::Integer));

        let mut s = session();
        s.set_field(text_field, Some(FieldValue::Text("O'Neil".into())));
        s.set_field(int_id, Some(FieldValue::Integer(7)));

        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        let executor = DatabaseExecutor::new(&config(), gateway.clone());
        let statement = format!(
            "UPDATE totes SET sku = {}, qty = {}",
            field_token(text_field),
            field_token(int_id)
        );
        let action = DatabaseAction::new(ModuleId::new(), statement);

        executor.execute(&action, &cache, &mut s).await;

        assert_eq!(
            gateway.executed_statements(),
            vec!["UPDATE totes SET sku = 'O''Neil', qty = 7".to_string()]
        );
    }

    #[tokio::test]
    async fn boolean_and_datetime_and_null_formatting() {
        let (mut cache, bool_field) = cache_with_typed_field("Active", FieldType::Boolean);
        let ts_id = ModuleId::new();
        cache.add_module(Module::new(
            ts_id,
            ApplicationId::new(),
            ModuleKind::Field,
            "ScannedAt",
        ));
        cache.add_field(Field::new(ts_id, FieldType::DateTime));
        let unset_id = ModuleId::new();
        cache.add_module(Module::new(
            unset_id,
            ApplicationId::new(),
            ModuleKind::Field,
            "Note",
        ));
        cache.add_field(Field::new(unset_id, FieldType::Text));

        let mut s = session();
        s.set_field(bool_field, Some(FieldValue::Boolean(true)));
        s.set_field(
            ts_id,
            Some(FieldValue::Timestamp(
                Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            )),
        );

        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        let executor = DatabaseExecutor::new(&config(), gateway.clone());
        let statement = format!(
            "INSERT INTO scans VALUES ({}, {}, {})",
            field_token(bool_field),
            field_token(ts_id),
            field_token(unset_id)
        );
        let action = DatabaseAction::new(ModuleId::new(), statement);

        executor.execute(&action, &cache, &mut s).await;

        assert_eq!(
            gateway.executed_statements(),
            vec!["INSERT INTO scans VALUES (TRUE, '2024-01-15 10:30:00', NULL)".to_string()]
        );
    }

    #[tokio::test]
    async fn returns_clause_maps_row_onto_fields() {
        let (cache, user_field) = cache_with_typed_field("UserId", FieldType::Text);

        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        gateway.push_row(vec![Some(FieldValue::Text("jdoe".into())), None]);

        let executor = DatabaseExecutor::new(&config(), gateway.clone());
        let mut s = session();
        let statement = format!(
            "SELECT user_id FROM users RETURNS({})",
            field_token(user_field)
        );
        let action = DatabaseAction::new(ModuleId::new(), statement);

        let result = executor.execute(&action, &cache, &mut s).await;

        assert!(result.passed());
        assert_eq!(s.render_field(user_field), "jdoe");
        assert_eq!(
            result.returned_fields.get(&user_field),
            Some(&Some(FieldValue::Text("jdoe".into())))
        );
        // the stripped statement carries no RETURNS clause
        assert_eq!(
            gateway.executed_statements(),
            vec!["SELECT user_id FROM users".to_string()]
        );
    }

    #[tokio::test]
    async fn null_column_clears_the_target_field() {
        let (cache, field) = cache_with_typed_field("UserId", FieldType::Text);

        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        gateway.push_row(vec![None]);

        let executor = DatabaseExecutor::new(&config(), gateway);
        let mut s = session();
        s.set_field(field, Some(FieldValue::Text("stale".into())));
        let statement = format!("SELECT user_id FROM users RETURNS({})", field_token(field));
        let action = DatabaseAction::new(ModuleId::new(), statement);

        let result = executor.execute(&action, &cache, &mut s).await;

        assert!(result.passed());
        assert!(!s.has_field(field));
        assert_eq!(result.returned_fields.get(&field), Some(&None));
    }

    #[tokio::test]
    async fn row_mapping_stops_at_shorter_side() {
        let (mut cache, f1) = cache_with_typed_field("A", FieldType::Text);
        let f2 = ModuleId::new();
        cache.add_module(Module::new(f2, ApplicationId::new(), ModuleKind::Field, "B"));
        cache.add_field(Field::new(f2, FieldType::Text));

        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        gateway.push_row(vec![Some(FieldValue::Text("only".into()))]);

        let executor = DatabaseExecutor::new(&config(), gateway);
        let mut s = session();
        let statement = format!(
            "SELECT a FROM t RETURNS({}, {})",
            field_token(f1),
            field_token(f2)
        );
        let action = DatabaseAction::new(ModuleId::new(), statement);

        executor.execute(&action, &cache, &mut s).await;

        assert_eq!(s.render_field(f1), "only");
        assert!(!s.has_field(f2));
    }

    #[tokio::test]
    async fn execution_error_becomes_fail_result() {
        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        gateway.fail_next_execution("relation does not exist");

        let executor = DatabaseExecutor::new(&config(), gateway);
        let mut s = session();
        let action = DatabaseAction::new(ModuleId::new(), "SELECT * FROM missing");

        let result = executor.execute(&action, &ModuleCache::new(), &mut s).await;

        assert!(result.failed());
        assert!(result.cause.as_deref().unwrap().contains("relation"));
    }

    #[tokio::test]
    async fn switching_databases_closes_previous_connection() {
        let gateway = Arc::new(InMemoryDatabaseGateway::new());
        let executor = DatabaseExecutor::new(&config(), gateway.clone());
        let mut s = session();

        executor
            .execute(
                &DatabaseAction::new(ModuleId::new(), "CONNECT WMS;"),
                &ModuleCache::new(),
                &mut s,
            )
            .await;
        executor
            .execute(
                &DatabaseAction::new(ModuleId::new(), "CONNECT ARCHIVE;"),
                &ModuleCache::new(),
                &mut s,
            )
            .await;

        assert_eq!(gateway.connect_count(), 2);
        assert_eq!(gateway.close_count(), 1);
        assert_eq!(s.current_database(), Some("ARCHIVE"));
    }
}
