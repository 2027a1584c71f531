pub mod cache;
pub use cache::FkCache;

mod connect;
pub use connect::connect;

mod executor;
pub use executor::Executor;

pub mod schema;
pub use schema::SchemaExt;

mod scope;
pub use scope::Scope;

pub mod stmt;

mod table_ref;
pub use table_ref::TableRef;

mod transaction;
pub use transaction::{Transaction, TransactionOptions};

pub use sextant_core::{
    driver::{Catalog, Connection, Flavor},
    schema::{SchemaDescription, Table, Type, View},
    stmt::{Row, Value},
    Error, Result, Schema,
};
