use crate::{
    schema::{Relation, Schema, Table, Type},
    Error, Result,
};

use indexmap::IndexMap;

/// Resolution context for the expressions of one statement.
///
/// The environment is bound to a base table and accumulates the joins
/// needed by the relational paths the compiler encounters. A path prefix is
/// joined once; later references to the same prefix reuse its alias.
/// Cloning deep-copies the alias map so clones extend independently.
#[derive(Debug, Clone)]
pub struct Env<'a> {
    schema: &'a Schema,
    table: &'a Table,

    /// Relation path prefix -> join alias
    refs: IndexMap<Vec<String>, String>,

    /// Joins, in the order they were first needed
    joins: Vec<Join>,

    /// Next alias suffix, per name
    counters: IndexMap<String, usize>,
}

/// `LEFT JOIN table AS alias ON (alias.column = parent.parent_column)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub alias: String,
    pub column: String,

    /// Alias of the joined-from relation, or the base table name
    pub parent: String,
    pub parent_column: String,
}

impl<'a> Env<'a> {
    pub fn new(schema: &'a Schema, table: &'a Table) -> Env<'a> {
        Env {
            schema,
            table,
            refs: IndexMap::new(),
            joins: vec![],
            counters: IndexMap::new(),
        }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn refs(&self) -> &IndexMap<Vec<String>, String> {
        &self.refs
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Returns the alias under which the relation reached by `path` is
    /// joined, planning the joins on first use. An empty path designates
    /// the base table.
    pub fn resolve<S: AsRef<str>>(&mut self, path: &[S]) -> Result<String> {
        let schema = self.schema;
        let mut table = self.table;
        let mut parent = self.table.name.clone();

        for depth in 1..=path.len() {
            let step = path[depth - 1].as_ref();
            let relation = table.relation(schema, step)?;
            let prefix: Vec<String> = path[..depth]
                .iter()
                .map(|step| step.as_ref().to_string())
                .collect();

            let alias = match self.refs.get(&prefix) {
                Some(alias) => alias.clone(),
                None => {
                    let alias = match relation {
                        Relation::ForeignKey { column, target } => {
                            self.join_foreign_key(step, column, target, &parent)?
                        }
                        Relation::OneToMany { target, path } => {
                            self.join_one_to_many(step, table, target, path, &parent)?
                        }
                    };
                    self.refs.insert(prefix, alias.clone());
                    alias
                }
            };

            table = match relation {
                Relation::ForeignKey { target, .. } => target,
                Relation::OneToMany { target, .. } => target,
            };
            parent = alias;
        }

        Ok(parent)
    }

    /// Type of the column designated by a possibly dotted path
    pub fn path_type(&self, path: &str) -> Result<Type> {
        self.table.path_type(self.schema, path)
    }

    fn join_foreign_key(
        &mut self,
        step: &str,
        column: &str,
        target: &Table,
        parent: &str,
    ) -> Result<String> {
        let pk = require_primary_key(target)?;
        let alias = self.next_alias(step);
        self.joins.push(Join {
            table: target.name.clone(),
            alias: alias.clone(),
            column: pk.to_string(),
            parent: parent.to_string(),
            parent_column: column.to_string(),
        });
        Ok(alias)
    }

    /// Joins a one-to-many relation by walking its foreign key path
    /// backwards, from `origin` to `target`.
    fn join_one_to_many(
        &mut self,
        step: &str,
        origin: &Table,
        target: &'a Table,
        path: &str,
        parent: &str,
    ) -> Result<String> {
        let steps: Vec<&str> = path.split('.').collect();

        // chain[i] holds the foreign key steps[i]
        let mut chain = vec![target];
        for step in &steps[..steps.len() - 1] {
            let next = chain[chain.len() - 1].follow(self.schema, &[*step])?;
            chain.push(next);
        }

        let mut prev_alias = parent.to_string();
        let mut prev_pk = require_primary_key(origin)?.to_string();

        for i in (0..steps.len()).rev() {
            let table = chain[i];
            let alias = if i == 0 {
                self.next_alias(step)
            } else {
                self.next_alias(&table.name)
            };

            self.joins.push(Join {
                table: table.name.clone(),
                alias: alias.clone(),
                column: steps[i].to_string(),
                parent: prev_alias,
                parent_column: std::mem::take(&mut prev_pk),
            });

            prev_alias = alias;
            if i > 0 {
                prev_pk = require_primary_key(table)?.to_string();
            }
        }

        Ok(prev_alias)
    }

    fn next_alias(&mut self, name: &str) -> String {
        let counter = self.counters.entry(name.to_string()).or_insert(0);
        let alias = format!("{name}_{counter}");
        *counter += 1;
        alias
    }
}

fn require_primary_key(table: &Table) -> Result<&str> {
    table.primary_key.as_deref().ok_or_else(|| {
        Error::incorrect_table_definition(
            &table.name,
            "a table without primary key cannot be joined",
        )
    })
}
