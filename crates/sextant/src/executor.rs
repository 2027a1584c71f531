use crate::cache::FkCache;

use sextant_core::{
    driver::Catalog,
    stmt::{Row, Value},
    Flavor, Result,
};

/// Runs rendered statements.
///
/// Implemented by [`Transaction`](crate::Transaction) and by
/// [`Scope`](crate::Scope), which forwards to its innermost transaction.
pub trait Executor {
    /// The flavor statements must be rendered for
    fn flavor(&self) -> Result<Flavor>;

    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>>;

    /// Executes `sql` once per argument row. When `returning` is set, the
    /// result holds the first returned row of every execution, aligned to
    /// `rows`.
    fn execute_many(&mut self, sql: &str, rows: &[Row], returning: bool) -> Result<Vec<Option<Row>>>;

    fn catalog(&mut self) -> Result<Catalog>;

    /// The foreign-key cache, when enabled
    fn fk_cache(&mut self) -> Result<Option<&mut FkCache>>;
}
