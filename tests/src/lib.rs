mod fixtures;
pub use fixtures::*;

#[macro_use]
mod macros;

use sextant::{schema, Connection, Result, Schema, Transaction, TransactionOptions};

/// A database the integration tests run against
pub trait Setup {
    fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Connects and creates `schema` from scratch.
    fn setup(&self, schema: &Schema) -> Box<dyn Connection> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let mut conn = self.connect().unwrap();
        Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
            schema::drop_tables(tx, schema)?;
            schema::create_tables(tx, schema)
        })
        .unwrap();
        conn
    }
}

/// Private in-memory SQLite database, one per connection
pub struct SetupSqlite;

impl Setup for SetupSqlite {
    fn connect(&self) -> Result<Box<dyn Connection>> {
        sextant::connect("sqlite://:memory:")
    }
}

/// PostgreSQL database named by `SEXTANT_TEST_POSTGRESQL`, defaulting to a
/// local `sextant_test` database
pub struct SetupPostgreSQL;

impl Setup for SetupPostgreSQL {
    fn connect(&self) -> Result<Box<dyn Connection>> {
        let url = std::env::var("SEXTANT_TEST_POSTGRESQL")
            .unwrap_or_else(|_| "postgresql://localhost/sextant_test".to_string());
        sextant::connect(&url)
    }
}
