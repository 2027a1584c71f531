use super::{
    upsert::conflict_key,
    write::{Lenient, Write},
};
use crate::Executor;

use sextant_core::{
    stmt::{Row, Value},
    Error, Result,
};
use sextant_sql::stmt as sql;

/// Updates existing rows, matched by primary key when it is written and by
/// natural key otherwise. Rows without a match are left alone and get no
/// identifier.
#[derive(Debug, Clone)]
pub struct Update<'a> {
    write: Write<'a>,
}

impl<'a> Update<'a> {
    pub(crate) fn new(write: Write<'a>) -> Update<'a> {
        Update { write }
    }

    pub fn lenient(mut self, lenient: Lenient) -> Update<'a> {
        self.write.set_lenient(lenient);
        self
    }

    /// Adds conditions every written row must satisfy.
    pub fn filter(mut self, conditions: &[&str]) -> Result<Update<'a>> {
        self.write.add_conditions(conditions)?;
        Ok(self)
    }

    pub fn execute(&self, exec: &mut dyn Executor, row: &[Value]) -> Result<Option<Value>> {
        let mut ids = self.execute_many(exec, &[row.to_vec()])?;
        Ok(ids.pop().flatten())
    }

    pub fn execute_many(&self, exec: &mut dyn Executor, rows: &[Row]) -> Result<Vec<Option<Value>>> {
        let table = self.write.table();
        let columns = self.write.written_columns();
        let key = conflict_key(table, &columns)?;

        let set: Vec<String> = columns
            .iter()
            .filter(|column| !key.contains(column))
            .cloned()
            .collect();

        if set.is_empty() {
            return Err(Error::invalid_statement(format!(
                "update of `{}` writes key columns only",
                table.name
            )));
        }

        let stmt = sql::Update {
            table: table.name.clone(),
            set,
            key,
            returning: table.primary_key.clone(),
        };
        self.write.run(exec, stmt, rows)
    }
}
