use crate::{cache::FkCache, Executor, Transaction};

use sextant_core::{
    driver::Catalog,
    stmt::{Row, Value},
    Error, Flavor, Result,
};

/// A stack of active transactions, owned by one thread or task.
///
/// Statements executed against a scope run in the innermost transaction at
/// execution time. Executing against an empty scope fails with a
/// no-active-transaction error.
#[derive(Debug, Default)]
pub struct Scope<'c> {
    stack: Vec<Transaction<'c>>,
}

impl<'c> Scope<'c> {
    pub fn new() -> Scope<'c> {
        Scope::default()
    }

    /// Makes `tx` the innermost transaction.
    pub fn enter(&mut self, tx: Transaction<'c>) {
        self.stack.push(tx);
    }

    /// Removes the innermost transaction and hands it back, unfinished.
    pub fn exit(&mut self) -> Option<Transaction<'c>> {
        self.stack.pop()
    }

    pub fn current(&mut self) -> Result<&mut Transaction<'c>> {
        self.stack.last_mut().ok_or_else(Error::no_active_transaction)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Runs `f` with `tx` as the innermost transaction, then ends it:
    /// commit when `f` succeeds (unless the transaction options ask for a
    /// rollback), rollback otherwise.
    pub fn run<T>(
        &mut self,
        tx: Transaction<'c>,
        f: impl FnOnce(&mut Scope<'c>) -> Result<T>,
    ) -> Result<T> {
        let depth = self.stack.len();
        self.enter(tx);

        let res = f(self);

        // `f` may leave inner transactions behind; they roll back on drop.
        self.stack.truncate(depth + 1);
        let tx = self.exit().ok_or_else(Error::no_active_transaction)?;

        match res {
            Ok(value) => {
                tx.finish(true)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.finish(false) {
                    tracing::warn!(err = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

impl Executor for Scope<'_> {
    fn flavor(&self) -> Result<Flavor> {
        self.stack
            .last()
            .map(Transaction::flavor)
            .ok_or_else(Error::no_active_transaction)
    }

    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        self.current()?.execute(sql, args)
    }

    fn execute_many(&mut self, sql: &str, rows: &[Row], returning: bool) -> Result<Vec<Option<Row>>> {
        self.current()?.execute_many(sql, rows, returning)
    }

    fn catalog(&mut self) -> Result<Catalog> {
        self.current()?.catalog()
    }

    fn fk_cache(&mut self) -> Result<Option<&mut FkCache>> {
        self.current()?.fk_cache()
    }
}
