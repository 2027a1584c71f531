//! Statement builders.
//!
//! Builders validate their expressions when they are extended and render
//! SQL only when executed, for the flavor of the executor at hand.

mod delete;
pub use delete::Delete;

mod query;
pub use query::Query;

mod select;
pub use select::Select;

mod update;
pub use update::Update;

mod upsert;
pub use upsert::{Conflict, Insert, Upsert};

pub(crate) mod write;
pub use write::Lenient;

pub use sextant_sql::stmt::Direction;
