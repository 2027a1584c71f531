use crate::stmt::{
    AddColumn, AddForeignKey, ColumnDef, CreateSequence, CreateTable, CreateView, DropSequence,
    DropView, PrimaryKey, Reference, Statement,
};

use sextant_core::{
    driver::Catalog,
    schema::{Schema, Table},
    Error, Flavor, Result,
};

use indexmap::IndexSet;

/// Ordered DDL statements reconciling a database with a declared schema.
///
/// Planning is idempotent: once the statements of a plan are applied, a
/// plan computed against the refreshed catalog is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationPlan {
    statements: Vec<Statement>,
}

/// Planner state for one `create` call
struct Planner<'a> {
    schema: &'a Schema,
    catalog: &'a Catalog,
    flavor: Flavor,

    /// Tables that exist, or will exist once the statements planned so far
    /// are applied.
    known: IndexSet<&'a str>,

    statements: Vec<Statement>,

    /// Foreign keys whose target did not exist yet
    deferred: Vec<Statement>,
}

impl MigrationPlan {
    /// Plans the statements creating every table, column, natural-key index
    /// and view of `schema` missing from `catalog`.
    pub fn create(schema: &Schema, catalog: &Catalog, flavor: Flavor) -> Result<MigrationPlan> {
        let mut planner = Planner {
            schema,
            catalog,
            flavor,
            known: catalog
                .tables
                .keys()
                .map(String::as_str)
                .filter(|name| schema.contains(name))
                .collect(),
            statements: vec![],
            deferred: vec![],
        };

        for table in creation_order(schema, catalog) {
            match catalog.table(&table.name) {
                None => planner.create_table(table)?,
                Some(_) => planner.add_columns(table)?,
            }
        }

        let mut statements = planner.statements;
        statements.append(&mut planner.deferred);

        for table in schema.tables() {
            if table.natural_key.is_empty() {
                continue;
            }

            let index = Statement::natural_key_index(&table.name, &table.natural_key);
            if let Statement::CreateIndex(create) = &index {
                if catalog.has_index(&create.name) {
                    continue;
                }
            }
            statements.push(index);
        }

        for view in schema.views() {
            if catalog.has_view(view.name()) || catalog.has_table(view.name()) {
                continue;
            }
            statements.push(
                CreateView {
                    name: view.name().to_string(),
                    definition: view.definition.clone(),
                }
                .into(),
            );
        }

        tracing::debug!(
            flavor = %flavor,
            statements = statements.len(),
            "planned schema migration"
        );

        Ok(MigrationPlan { statements })
    }

    /// Plans the statements dropping every view and table of `schema`.
    /// Views go first, then tables in reverse creation order.
    pub fn drop(schema: &Schema, flavor: Flavor) -> MigrationPlan {
        let mut statements = vec![];

        for view in schema.views() {
            statements.push(
                DropView {
                    name: view.name().to_string(),
                }
                .into(),
            );
        }

        let order = creation_order(schema, &Catalog::new());
        for table in order.into_iter().rev() {
            statements.push(Statement::drop_table_if_exists(&table.name));

            if let Some(sequence) = key_sequence(table, flavor) {
                statements.push(DropSequence { name: sequence }.into());
            }
        }

        MigrationPlan { statements }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }
}

impl IntoIterator for MigrationPlan {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl<'a> Planner<'a> {
    fn create_table(&mut self, table: &'a Table) -> Result<()> {
        // A table may reference itself
        self.known.insert(&table.name);

        let primary_key = match &table.primary_key {
            None => None,
            Some(pk) if table.is_custom_primary_key() => {
                Some(PrimaryKey::Custom(self.column_def(table, pk)?))
            }
            Some(pk) => {
                let sequence = key_sequence(table, self.flavor);
                if let Some(name) = &sequence {
                    self.statements
                        .push(CreateSequence { name: name.clone() }.into());
                }
                Some(PrimaryKey::Surrogate {
                    name: pk.clone(),
                    sequence,
                })
            }
        };

        let mut columns = vec![];
        for name in table.columns.keys() {
            if table.is_primary_key(name) {
                continue;
            }
            columns.push(self.column_def(table, name)?);
        }

        tracing::debug!(table = %table.name, "planning table creation");

        self.statements.push(
            CreateTable {
                name: table.name.clone(),
                primary_key,
                columns,
            }
            .into(),
        );

        Ok(())
    }

    fn add_columns(&mut self, table: &'a Table) -> Result<()> {
        for name in table.columns.keys() {
            if table.is_primary_key(name) || self.catalog.has_column(&table.name, name) {
                continue;
            }

            tracing::debug!(table = %table.name, column = %name, "planning new column");

            let column = self.column_def(table, name)?;
            self.statements.push(
                AddColumn {
                    table: table.name.clone(),
                    column,
                }
                .into(),
            );
        }

        Ok(())
    }

    /// Column definition with its foreign key inlined when the target is
    /// known, deferred otherwise.
    fn column_def(&mut self, table: &Table, name: &str) -> Result<ColumnDef> {
        let ty = table.resolve_column(name)?;

        let reference = match table.foreign_keys.get(name) {
            Some(target) => {
                let reference = self.reference(target)?;
                if self.known.contains(target.as_str())
                    || self.flavor.capability().forward_references
                {
                    Some(reference)
                } else {
                    self.defer(table, name, reference)?;
                    None
                }
            }
            None => None,
        };

        Ok(ColumnDef::from_schema(table, name, ty, reference))
    }

    fn reference(&self, target: &str) -> Result<Reference> {
        let target = self.schema.table(target)?;
        let column = target.primary_key.clone().ok_or_else(|| {
            Error::incorrect_table_definition(
                &target.name,
                "referenced by a foreign key but has no primary key",
            )
        })?;

        Ok(Reference {
            table: target.name.clone(),
            column,
        })
    }

    fn defer(&mut self, table: &Table, column: &str, references: Reference) -> Result<()> {
        if !self.flavor.capability().add_constraint {
            return Err(Error::incorrect_table_definition(
                &table.name,
                format!(
                    "foreign key `{column}` references `{}` before it is created",
                    references.table
                ),
            ));
        }

        tracing::debug!(
            table = %table.name,
            column,
            target = %references.table,
            "deferring foreign key"
        );

        self.deferred.push(
            AddForeignKey {
                table: table.name.clone(),
                column: column.to_string(),
                references,
            }
            .into(),
        );

        Ok(())
    }
}

/// Name of the sequence backing a surrogate key, for flavors drawing keys
/// from sequences.
fn key_sequence(table: &Table, flavor: Flavor) -> Option<String> {
    let pk = table.primary_key.as_ref()?;
    if table.is_custom_primary_key() || !flavor.capability().key_sequence {
        return None;
    }
    Some(format!("{}_{pk}_seq", table.name))
}

/// Tables in dependency order: a table comes after the tables its foreign
/// keys reference. Declaration order is kept otherwise. When a cycle leaves
/// no table ready, the first remaining one is taken and the references it
/// cannot satisfy are deferred by the planner.
fn creation_order<'a>(schema: &'a Schema, catalog: &Catalog) -> Vec<&'a Table> {
    let mut ready: IndexSet<&str> = IndexSet::new();
    let mut remaining: Vec<&Table> = schema.tables().collect();
    let mut ret = vec![];

    while !remaining.is_empty() {
        let pos = remaining
            .iter()
            .position(|table| {
                table.foreign_keys.values().all(|target| {
                    target == &table.name
                        || ready.contains(target.as_str())
                        || catalog.has_table(target)
                })
            })
            .unwrap_or(0);

        let table = remaining.remove(pos);
        ready.insert(&table.name);
        ret.push(table);
    }

    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use sextant_core::schema::Type;

    #[test]
    fn creation_order_follows_foreign_keys() {
        let mut schema = Schema::new();
        schema
            .add(Table::new("b").column("a", Type::BigInt).foreign_key("a", "a"))
            .unwrap();
        schema.add(Table::new("a").column("name", Type::Text)).unwrap();

        let order: Vec<_> = creation_order(&schema, &Catalog::new())
            .into_iter()
            .map(|table| table.name.as_str())
            .collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn creation_order_breaks_cycles() {
        let mut schema = Schema::new();
        schema
            .add(Table::new("a").column("b", Type::BigInt).foreign_key("b", "b"))
            .unwrap();
        schema
            .add(Table::new("b").column("a", Type::BigInt).foreign_key("a", "a"))
            .unwrap();

        let order: Vec<_> = creation_order(&schema, &Catalog::new())
            .into_iter()
            .map(|table| table.name.as_str())
            .collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn sequence_only_for_surrogate_keys() {
        let table = Table::new("city");
        assert_eq!(
            key_sequence(&table, Flavor::Duckdb).as_deref(),
            Some("city_id_seq")
        );
        assert_eq!(key_sequence(&table, Flavor::Postgresql), None);

        let table = Table::new("tag").column("code", Type::Text).primary_key(Some("code"));
        assert_eq!(key_sequence(&table, Flavor::Duckdb), None);
    }
}
