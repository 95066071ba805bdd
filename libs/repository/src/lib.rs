//! Generic Postgres persistence layer for ClassConnect services
//!
//! Services hand a [`QueryParser`] implementation to a [`Repository`]; the
//! parser owns all SQL text, argument ordering and row scanning, while the
//! repository owns execution and the mapping from database outcomes to the
//! platform's uniform `ApiResponse` envelopes.

mod db;
mod query_parser;
mod repository;

pub use db::{connect, run_migrations, DatabaseConfig, DbError};
pub use query_parser::{QueryParser, SqlQuery, SqlValue};
pub use repository::Repository;
