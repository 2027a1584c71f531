use super::write::{Lenient, Write};
use crate::Executor;

use sextant_core::{
    schema::Table,
    stmt::{Row, Value},
    Error, Result,
};
use sextant_sql::stmt as sql;

/// What an upsert does with a row whose key already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Conflict {
    /// Overwrite the non-key columns. The identifier of the row is
    /// returned whether it was inserted or updated.
    #[default]
    Update,

    /// Leave the existing row untouched and return no identifier for it.
    Nothing,
}

/// Insert-or-update keyed by the primary key, when written, or by the
/// natural key.
#[derive(Debug, Clone)]
pub struct Upsert<'a> {
    write: Write<'a>,
    conflict: Conflict,
}

/// Plain insert: every row creates a new record.
#[derive(Debug, Clone)]
pub struct Insert<'a> {
    write: Write<'a>,
}

impl<'a> Upsert<'a> {
    pub(crate) fn new(write: Write<'a>) -> Upsert<'a> {
        Upsert {
            write,
            conflict: Conflict::Update,
        }
    }

    pub fn lenient(mut self, lenient: Lenient) -> Upsert<'a> {
        self.write.set_lenient(lenient);
        self
    }

    pub fn on_conflict(mut self, conflict: Conflict) -> Upsert<'a> {
        self.conflict = conflict;
        self
    }

    /// Adds conditions every written row must satisfy.
    pub fn filter(mut self, conditions: &[&str]) -> Result<Upsert<'a>> {
        self.write.add_conditions(conditions)?;
        Ok(self)
    }

    pub fn execute(&self, exec: &mut dyn Executor, row: &[Value]) -> Result<Option<Value>> {
        let mut ids = self.execute_many(exec, &[row.to_vec()])?;
        Ok(ids.pop().flatten())
    }

    /// Writes `rows` in order and returns one identifier per row.
    pub fn execute_many(&self, exec: &mut dyn Executor, rows: &[Row]) -> Result<Vec<Option<Value>>> {
        let stmt = self.statement()?;
        self.write.run(exec, stmt, rows)
    }

    fn statement(&self) -> Result<sql::Insert> {
        let table = self.write.table();
        let columns = self.write.written_columns();
        let key = conflict_key(table, &columns)?;

        let update = match self.conflict {
            Conflict::Nothing => vec![],
            Conflict::Update => {
                let update: Vec<String> = columns
                    .iter()
                    .filter(|column| !key.contains(column))
                    .cloned()
                    .collect();

                // Overwriting the key with itself still reports the row
                if update.is_empty() {
                    key.clone()
                } else {
                    update
                }
            }
        };

        Ok(sql::Insert {
            table: table.name.clone(),
            columns,
            on_conflict: Some(sql::OnConflict { key, update }),
            returning: table.primary_key.clone(),
        })
    }
}

impl<'a> Insert<'a> {
    pub(crate) fn new(write: Write<'a>) -> Insert<'a> {
        Insert { write }
    }

    pub fn lenient(mut self, lenient: Lenient) -> Insert<'a> {
        self.write.set_lenient(lenient);
        self
    }

    /// Adds conditions every written row must satisfy.
    pub fn filter(mut self, conditions: &[&str]) -> Result<Insert<'a>> {
        self.write.add_conditions(conditions)?;
        Ok(self)
    }

    pub fn execute(&self, exec: &mut dyn Executor, row: &[Value]) -> Result<Option<Value>> {
        let mut ids = self.execute_many(exec, &[row.to_vec()])?;
        Ok(ids.pop().flatten())
    }

    pub fn execute_many(&self, exec: &mut dyn Executor, rows: &[Row]) -> Result<Vec<Option<Value>>> {
        let table = self.write.table();
        let stmt = sql::Insert {
            table: table.name.clone(),
            columns: self.write.written_columns(),
            on_conflict: None,
            returning: table.primary_key.clone(),
        };
        self.write.run(exec, stmt, rows)
    }
}

/// The primary key when it is written, the natural key otherwise.
pub(super) fn conflict_key(table: &Table, columns: &[String]) -> Result<Vec<String>> {
    if let Some(pk) = &table.primary_key {
        if columns.contains(pk) {
            return Ok(vec![pk.clone()]);
        }
    }

    if table.natural_key.is_empty() {
        return Err(Error::invalid_statement(format!(
            "table `{}` has no natural key and its primary key is not written",
            table.name
        )));
    }

    if let Some(missing) = table
        .natural_key
        .iter()
        .find(|column| !columns.contains(column))
    {
        return Err(Error::invalid_statement(format!(
            "natural key column `{missing}` of table `{}` is not written",
            table.name
        )));
    }

    Ok(table.natural_key.clone())
}
