use super::{Column, Schema, Type};
use crate::{Error, Result};

use indexmap::{IndexMap, IndexSet};

/// Name of the surrogate primary key when none is declared.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// A declared table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Name of the table
    pub name: String,

    /// Declared columns, in declaration order. The primary key is only
    /// listed here when its type is declared by the caller.
    pub columns: IndexMap<String, Column>,

    /// Foreign key column -> referenced table name
    pub foreign_keys: IndexMap<String, String>,

    /// Columns forming the natural key, possibly composite
    pub natural_key: Vec<String>,

    /// Primary key column name, `None` for key-less (append-only) tables
    pub primary_key: Option<String>,

    /// Columns declared `NOT NULL`. Natural key columns are implicitly not
    /// null and need not be listed.
    pub not_null: IndexSet<String>,

    /// Column -> SQL default expression
    pub default: IndexMap<String, String>,

    /// Virtual relation name -> `target_table.fk_column[.further_path]`
    pub one2many: IndexMap<String, String>,
}

/// How one step of a relational path leaves a table.
#[derive(Debug, Clone, Copy)]
pub enum Relation<'a> {
    /// The step is a foreign key column pointing at `target`.
    ForeignKey { column: &'a str, target: &'a Table },

    /// The step is a one-to-many relation. `path` is the foreign key path
    /// leading from `target` back to the table the step was taken from.
    OneToMany { target: &'a Table, path: &'a str },
}

impl Table {
    pub fn new(name: impl Into<String>) -> Table {
        Table {
            name: name.into(),
            columns: IndexMap::new(),
            foreign_keys: IndexMap::new(),
            natural_key: vec![],
            primary_key: Some(DEFAULT_PRIMARY_KEY.to_string()),
            not_null: IndexSet::new(),
            default: IndexMap::new(),
            one2many: IndexMap::new(),
        }
    }

    pub fn column(mut self, name: impl Into<String>, ty: Type) -> Table {
        let name = name.into();
        self.columns.insert(name.clone(), Column::new(name, ty));
        self
    }

    pub fn foreign_key(mut self, column: impl Into<String>, target: impl Into<String>) -> Table {
        self.foreign_keys.insert(column.into(), target.into());
        self
    }

    pub fn natural_key<I, S>(mut self, columns: I) -> Table
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.natural_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn not_null<I, S>(mut self, columns: I) -> Table
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_null.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn default_value(mut self, column: impl Into<String>, expr: impl Into<String>) -> Table {
        self.default.insert(column.into(), expr.into());
        self
    }

    /// Sets the primary key column, `None` for a key-less table.
    pub fn primary_key(mut self, name: Option<&str>) -> Table {
        self.primary_key = name.map(str::to_string);
        self
    }

    pub fn one2many(mut self, name: impl Into<String>, path: impl Into<String>) -> Table {
        self.one2many.insert(name.into(), path.into());
        self
    }

    /// Returns `true` if the primary key column is declared among the
    /// columns (with a caller-chosen type) rather than being an
    /// auto-incrementing surrogate.
    pub fn is_custom_primary_key(&self) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| self.columns.contains_key(pk))
    }

    /// Type of the primary key, `None` for key-less tables.
    pub fn primary_key_type(&self) -> Option<Type> {
        let pk = self.primary_key.as_ref()?;
        Some(
            self.columns
                .get(pk)
                .map(|column| column.ty.clone())
                .unwrap_or(Type::BigInt),
        )
    }

    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_key.as_deref() == Some(name)
    }

    /// Type of a column, including the implicit primary key.
    pub fn column_type(&self, name: &str) -> Option<Type> {
        match self.columns.get(name) {
            Some(column) => Some(column.ty.clone()),
            None if self.is_primary_key(name) => self.primary_key_type(),
            None => None,
        }
    }

    /// Like [`Table::column_type`] but fails with an unknown reference
    /// error.
    pub fn resolve_column(&self, name: &str) -> Result<Type> {
        self.column_type(name).ok_or_else(|| {
            Error::unknown_reference(format!(
                "column `{name}` on table `{}`",
                self.name
            ))
        })
    }

    pub fn is_not_null(&self, column: &str) -> bool {
        self.not_null.contains(column) || self.natural_key.iter().any(|c| c == column)
    }

    /// Resolves one step of a relational path.
    pub fn relation<'a>(&'a self, schema: &'a Schema, step: &str) -> Result<Relation<'a>> {
        if let Some((column, target)) = self.foreign_keys.get_key_value(step) {
            let target = schema.table(target)?;
            return Ok(Relation::ForeignKey { column, target });
        }

        if let Some(relation) = self.one2many.get(step) {
            let Some((target, path)) = relation.split_once('.') else {
                return Err(Error::incorrect_table_definition(
                    &self.name,
                    format!("one2many relation `{step}` must be `table.column`, got `{relation}`"),
                ));
            };
            let target = schema.table(target)?;
            return Ok(Relation::OneToMany { target, path });
        }

        Err(Error::unknown_reference(format!(
            "`{step}` is not a relation of table `{}`",
            self.name
        )))
    }

    /// Follows every step of `path` and returns the table reached.
    pub fn follow<'a>(&'a self, schema: &'a Schema, path: &[&str]) -> Result<&'a Table> {
        let mut table = self;
        for step in path {
            table = match table.relation(schema, step)? {
                Relation::ForeignKey { target, .. } => target,
                Relation::OneToMany { target, .. } => target,
            };
        }
        Ok(table)
    }

    /// Type of the column reached by a dotted path such as
    /// `parent.parent.name`.
    pub fn path_type(&self, schema: &Schema, path: &str) -> Result<Type> {
        let steps: Vec<&str> = path.split('.').collect();
        let (column, relations) = steps
            .split_last()
            .ok_or_else(|| Error::unknown_reference("empty path"))?;
        self.follow(schema, relations)?.resolve_column(column)
    }

    /// Columns selected when a statement names none: every declared column,
    /// with foreign keys expanded to the natural key of the table they
    /// reference (`parent` becomes `parent.name`).
    pub fn default_columns(&self, schema: &Schema) -> Vec<String> {
        let mut ret = vec![];
        for column in self.columns.keys() {
            if self.is_primary_key(column) {
                continue;
            }
            self.expand_column(schema, column, &mut vec![], &mut ret);
        }
        ret
    }

    /// The natural key with foreign keys expanded to paths, e.g.
    /// `["city.name", "timestamp"]` for a key declared as `["city", "timestamp"]`.
    pub fn natural_key_paths(&self, schema: &Schema) -> Vec<String> {
        let mut ret = vec![];
        for column in &self.natural_key {
            self.expand_column(schema, column, &mut vec![], &mut ret);
        }
        ret
    }

    fn expand_column<'a>(
        &'a self,
        schema: &'a Schema,
        column: &str,
        seen: &mut Vec<&'a str>,
        dst: &mut Vec<String>,
    ) {
        let target = self
            .foreign_keys
            .get(column)
            .and_then(|target| schema.table(target).ok());

        match target {
            Some(target) if !target.natural_key.is_empty() && !seen.contains(&&*target.name) => {
                seen.push(&target.name);
                for key in &target.natural_key {
                    let mut nested = vec![];
                    target.expand_column(schema, key, seen, &mut nested);
                    dst.extend(nested.into_iter().map(|path| format!("{column}.{path}")));
                }
                seen.pop();
            }
            _ => dst.push(column.to_string()),
        }
    }
}
