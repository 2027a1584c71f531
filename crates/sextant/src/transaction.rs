use crate::{cache::FkCache, Executor};

use sextant_core::{
    driver::Catalog,
    stmt::{Row, Value},
    Connection, Flavor, Result,
};

/// Transaction settings
#[derive(Debug, Clone, Default)]
pub struct TransactionOptions {
    /// Roll back instead of committing when the transaction ends normally.
    pub rollback: bool,

    /// Capacity of the foreign-key resolution cache. `None` disables it.
    pub fk_cache: Option<usize>,
}

/// A database transaction over one borrowed connection.
///
/// The transaction ends exactly once: with [`Transaction::commit`],
/// [`Transaction::rollback`], [`Transaction::finish`], or by being dropped,
/// which rolls back.
#[derive(Debug)]
pub struct Transaction<'c> {
    conn: &'c mut dyn Connection,
    options: TransactionOptions,
    cache: Option<FkCache>,
    done: bool,
}

impl TransactionOptions {
    /// Enables the foreign-key cache with the default capacity.
    pub fn with_fk_cache(mut self) -> TransactionOptions {
        self.fk_cache = Some(FkCache::DEFAULT_CAPACITY);
        self
    }

    pub fn with_rollback(mut self) -> TransactionOptions {
        self.rollback = true;
        self
    }
}

impl<'c> Transaction<'c> {
    /// Begins a transaction on `conn`.
    pub fn new(conn: &'c mut dyn Connection, options: TransactionOptions) -> Result<Transaction<'c>> {
        conn.begin()?;

        tracing::debug!(flavor = %conn.flavor(), "transaction started");

        Ok(Transaction {
            conn,
            cache: options.fk_cache.map(FkCache::new),
            options,
            done: false,
        })
    }

    /// Runs `f` in a new transaction. The transaction commits when `f`
    /// succeeds, unless the options ask for a rollback, and rolls back when
    /// it fails.
    pub fn run<T>(
        conn: &'c mut dyn Connection,
        options: TransactionOptions,
        f: impl FnOnce(&mut Transaction<'c>) -> Result<T>,
    ) -> Result<T> {
        let mut tx = Transaction::new(conn, options)?;

        match f(&mut tx) {
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

    pub fn flavor(&self) -> Flavor {
        self.conn.flavor()
    }

    pub fn options(&self) -> &TransactionOptions {
        &self.options
    }

    pub fn commit(mut self) -> Result<()> {
        self.done = true;
        tracing::debug!(flavor = %self.flavor(), "commit");
        self.conn.commit()
    }

    pub fn rollback(mut self) -> Result<()> {
        self.done = true;
        tracing::debug!(flavor = %self.flavor(), "rollback");
        self.conn.rollback()
    }

    /// Ends the transaction: commits when `ok` is set and the options do
    /// not ask for a rollback, rolls back otherwise.
    pub fn finish(self, ok: bool) -> Result<()> {
        if ok && !self.options.rollback {
            self.commit()
        } else {
            self.rollback()
        }
    }
}

impl Executor for Transaction<'_> {
    fn flavor(&self) -> Result<Flavor> {
        Ok(self.conn.flavor())
    }

    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        tracing::debug!(flavor = %self.conn.flavor(), args = args.len(), sql, "execute");
        self.conn.execute(sql, args)
    }

    fn execute_many(&mut self, sql: &str, rows: &[Row], returning: bool) -> Result<Vec<Option<Row>>> {
        tracing::debug!(
            flavor = %self.conn.flavor(),
            rows = rows.len(),
            returning,
            sql,
            "execute many"
        );
        self.conn.execute_many(sql, rows, returning)
    }

    fn catalog(&mut self) -> Result<Catalog> {
        self.conn.catalog()
    }

    fn fk_cache(&mut self) -> Result<Option<&mut FkCache>> {
        Ok(self.cache.as_mut())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }

        tracing::debug!(flavor = %self.conn.flavor(), "rollback on drop");

        if let Err(err) = self.conn.rollback() {
            tracing::warn!(%err, "rollback failed");
        }
    }
}
