//! Adapters: concrete implementations of the engine's ports.

pub mod clock;
pub mod memory;
pub mod postgres;

pub use clock::{ManualClock, SystemClock};
pub use memory::{InMemoryApplicationLoader, InMemoryDatabaseGateway};
pub use postgres::PostgresGateway;
