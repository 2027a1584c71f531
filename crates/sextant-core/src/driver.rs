mod capability;
pub use capability::Capability;

mod catalog;
pub use catalog::{Catalog, CatalogColumn, CatalogTable};

mod flavor;
pub use flavor::Flavor;

use crate::{
    stmt::{Row, Value},
    Result,
};

use std::fmt::Debug;

/// A live connection to one database.
///
/// Connections are used by one transaction at a time. Statements arrive
/// fully rendered for the connection's [`Flavor`], with positional
/// arguments aligned to the placeholders.
pub trait Connection: Debug + Send {
    /// The SQL dialect spoken by this connection
    fn flavor(&self) -> Flavor;

    /// Execute a statement and return every row it produces.
    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>>;

    /// Execute a statement once per argument row.
    ///
    /// When `returning` is set, the result holds one entry per input row,
    /// in input order: the first row returned by that execution, or `None`
    /// when the execution returned nothing. Otherwise the result is empty.
    ///
    /// The default implementation issues one `execute` per row, which is
    /// how backends without multi-row `RETURNING` support emulate it.
    fn execute_many(
        &mut self,
        sql: &str,
        rows: &[Row],
        returning: bool,
    ) -> Result<Vec<Option<Row>>> {
        let mut ret = vec![];
        for args in rows {
            let rows = self.execute(sql, args)?;
            if returning {
                ret.push(rows.into_iter().next());
            }
        }
        Ok(ret)
    }

    fn begin(&mut self) -> Result<()> {
        self.execute(self.flavor().begin_statement(), &[])?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.execute(self.flavor().commit_statement(), &[])?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.execute(self.flavor().rollback_statement(), &[])?;
        Ok(())
    }

    /// Lists the tables, columns, keys and indexes currently in the
    /// database.
    fn catalog(&mut self) -> Result<Catalog>;
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn flavor(&self) -> Flavor {
        (**self).flavor()
    }

    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        (**self).execute(sql, args)
    }

    fn execute_many(
        &mut self,
        sql: &str,
        rows: &[Row],
        returning: bool,
    ) -> Result<Vec<Option<Row>>> {
        (**self).execute_many(sql, rows, returning)
    }

    fn begin(&mut self) -> Result<()> {
        (**self).begin()
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<()> {
        (**self).rollback()
    }

    fn catalog(&mut self) -> Result<Catalog> {
        (**self).catalog()
    }
}
