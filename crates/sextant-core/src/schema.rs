mod column;
pub use column::Column;

mod description;
pub use description::{SchemaDescription, TableDescription, ViewDescription};

mod reflect;

mod table;
pub use table::{Relation, Table, DEFAULT_PRIMARY_KEY};

mod ty;
pub use ty::Type;

mod view;
pub use view::View;

use crate::{Error, Result};

use indexmap::IndexMap;

/// The set of tables and views known to an application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    tables: IndexMap<String, Table>,
    views: IndexMap<String, View>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema::default()
    }

    /// Registers a table. Names are unique across tables and views.
    pub fn add(&mut self, table: Table) -> Result<()> {
        if self.contains(&table.name) {
            return Err(Error::duplicate_table(&table.name));
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    pub fn add_view(&mut self, view: View) -> Result<()> {
        if self.contains(view.name()) {
            return Err(Error::duplicate_table(view.name()));
        }
        self.views.insert(view.name().to_string(), view);
        Ok(())
    }

    /// Drops every registration.
    pub fn reset(&mut self) {
        self.tables.clear();
        self.views.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name) || self.views.contains_key(name)
    }

    /// Returns the table or view layout with the given name.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .or_else(|| self.views.get(name).map(|view| &view.table))
            .ok_or_else(|| Error::unknown_reference(format!("table `{name}`")))
    }

    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> {
        self.tables.values()
    }

    pub fn views(&self) -> impl ExactSizeIterator<Item = &View> {
        self.views.values()
    }

    pub fn is_view(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    /// Checks that every table definition is consistent with the rest of
    /// the schema.
    pub fn verify(&self) -> Result<()> {
        for table in self.tables.values() {
            self.verify_table(table)
                .map_err(|err| err.context(format!("invalid table `{}`", table.name)))?;
        }
        Ok(())
    }

    fn verify_table(&self, table: &Table) -> Result<()> {
        let declared = |column: &str| table.column_type(column).is_some();

        for (column, target) in &table.foreign_keys {
            if !declared(column) {
                return Err(Error::incorrect_table_definition(
                    &table.name,
                    format!("foreign key `{column}` is not a declared column"),
                ));
            }
            let target_table = self.tables.get(target).ok_or_else(|| {
                Error::incorrect_table_definition(
                    &table.name,
                    format!("foreign key `{column}` references unknown table `{target}`"),
                )
            })?;
            if target_table.primary_key.is_none() {
                return Err(Error::incorrect_table_definition(
                    &table.name,
                    format!("foreign key `{column}` references `{target}` which has no primary key"),
                ));
            }
        }

        let names = table
            .natural_key
            .iter()
            .chain(&table.not_null)
            .chain(table.default.keys());
        for column in names {
            if !declared(column) {
                return Err(Error::incorrect_table_definition(
                    &table.name,
                    format!("`{column}` is not a declared column"),
                ));
            }
        }

        for name in table.one2many.keys() {
            if let Relation::OneToMany { target, path } = table.relation(self, name)? {
                let steps: Vec<&str> = path.split('.').collect();
                let reached = target.follow(self, &steps)?;
                if reached.name != table.name {
                    return Err(Error::incorrect_table_definition(
                        &table.name,
                        format!(
                            "one2many `{name}` leads to `{}` instead of `{}`",
                            reached.name, table.name
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}
