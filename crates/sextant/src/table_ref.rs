use crate::{
    stmt::{write::Write, Delete, Direction, Insert, Select, Update, Upsert},
    Executor,
};

use sextant_core::{
    schema::{Schema, Table},
    stmt::{Env, Value},
    Result,
};

/// Entry point for the statements on one table or view.
#[derive(Debug, Clone, Copy)]
pub struct TableRef<'a> {
    schema: &'a Schema,
    table: &'a Table,
}

impl<'a> TableRef<'a> {
    pub fn new(schema: &'a Schema, name: &str) -> Result<TableRef<'a>> {
        Ok(TableRef {
            schema,
            table: schema.table(name)?,
        })
    }

    pub fn name(&self) -> &'a str {
        &self.table.name
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn env(&self) -> Env<'a> {
        Env::new(self.schema, self.table)
    }

    /// Selects `columns`, or the default columns of the table when empty:
    /// foreign keys are then selected through the natural key of the table
    /// they reference.
    pub fn select(&self, columns: &[&str]) -> Result<Select<'a>> {
        let select = Select::new(self.env());
        if columns.is_empty() {
            let defaults = self.table.default_columns(self.schema);
            let defaults: Vec<&str> = defaults.iter().map(String::as_str).collect();
            select.select(&defaults)
        } else {
            select.select(columns)
        }
    }

    pub fn delete(&self) -> Delete<'a> {
        Delete::new(self.env())
    }

    pub fn upsert(&self, columns: &[&str]) -> Result<Upsert<'a>> {
        Ok(Upsert::new(Write::new(self.schema, self.table, columns)?))
    }

    pub fn insert(&self, columns: &[&str]) -> Result<Insert<'a>> {
        Ok(Insert::new(Write::new(self.schema, self.table, columns)?))
    }

    pub fn update(&self, columns: &[&str]) -> Result<Update<'a>> {
        Ok(Update::new(Write::new(self.schema, self.table, columns)?))
    }

    /// Distinct values of a column or foreign key path, in ascending order,
    /// optionally restricted to values matching a `LIKE` pattern.
    pub fn suggest(
        &self,
        exec: &mut dyn Executor,
        path: &str,
        like: Option<&str>,
    ) -> Result<Vec<Value>> {
        let mut select = self
            .select(&[path])?
            .distinct()
            .order_by(path, Direction::Asc)?;

        let mut args = vec![];
        if let Some(pattern) = like {
            let condition = format!("(like {path} {{}})");
            select = select.filter(&[condition.as_str()])?;
            args.push(Value::from(pattern));
        }

        Ok(select
            .execute(exec, &args)?
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .collect())
    }
}
