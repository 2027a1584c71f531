use crate::{Executor, TableRef};

use sextant_core::{stmt::Param, Result, Schema};
use sextant_sql::Serializer;

pub use sextant_sql::MigrationPlan;

/// Statement entry points on a [`Schema`]
pub trait SchemaExt {
    /// The table or view named `name`
    fn table_ref(&self, name: &str) -> Result<TableRef<'_>>;
}

impl SchemaExt for Schema {
    fn table_ref(&self, name: &str) -> Result<TableRef<'_>> {
        TableRef::new(self, name)
    }
}

/// Creates the tables, columns, indexes and views of `schema` missing from
/// the database.
pub fn create_tables(exec: &mut dyn Executor, schema: &Schema) -> Result<()> {
    let plan = plan_migration(exec, schema)?;
    apply(exec, plan)
}

/// The statements `create_tables` would run, without running them.
pub fn plan_migration(exec: &mut dyn Executor, schema: &Schema) -> Result<MigrationPlan> {
    let flavor = exec.flavor()?;
    let catalog = exec.catalog()?;
    MigrationPlan::create(schema, &catalog, flavor)
}

/// Drops every view and table of `schema`.
pub fn drop_tables(exec: &mut dyn Executor, schema: &Schema) -> Result<()> {
    let plan = MigrationPlan::drop(schema, exec.flavor()?);
    apply(exec, plan)
}

/// Builds a schema from the tables found in the database.
pub fn load_schema_from_db(exec: &mut dyn Executor) -> Result<Schema> {
    let flavor = exec.flavor()?;
    let catalog = exec.catalog()?;
    Schema::from_catalog(&catalog, flavor)
}

fn apply(exec: &mut dyn Executor, plan: MigrationPlan) -> Result<()> {
    let serializer = Serializer::new(exec.flavor()?);

    for stmt in plan {
        let mut params: Vec<Param> = vec![];
        let sql = serializer.serialize(&stmt, &mut params);
        tracing::info!(sql = %sql, "migrate");
        exec.execute(&sql, &[])?;
    }

    Ok(())
}
