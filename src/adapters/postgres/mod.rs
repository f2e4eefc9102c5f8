//! PostgreSQL adapters.

mod gateway;

pub use gateway::PostgresGateway;
