use super::Query;
use crate::{Executor, TableRef};

use sextant_core::{
    schema::{Schema, Table},
    stmt::{Ast, Env, Row, Sql, Value},
    Error, Flavor, Result,
};
use sextant_sql::stmt as sql;

use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Which unresolved foreign keys become `NULL` instead of failing the write
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Lenient {
    #[default]
    None,

    All,

    /// Foreign key columns (`city`) or paths (`city.name`)
    Columns(Vec<String>),
}

/// State shared by the write statements: the requested columns, the
/// leniency and the write-time conditions.
#[derive(Debug, Clone)]
pub(crate) struct Write<'a> {
    schema: &'a Schema,
    table: &'a Table,

    /// Requested columns, possibly foreign key paths
    columns: Vec<String>,

    lenient: Lenient,

    conditions: Vec<Ast>,

    /// Table columns written, in order of first appearance
    slots: Vec<Slot<'a>>,
}

#[derive(Debug, Clone)]
enum Slot<'a> {
    /// Value taken as is from the requested column at this index
    Direct { column: String, index: usize },

    /// Foreign key resolved from natural-key values
    Resolved(Group<'a>),
}

/// Requested paths sharing their first step
#[derive(Debug, Clone)]
struct Group<'a> {
    /// Local foreign key column
    column: String,

    target: &'a Table,

    /// Paths on `target`, e.g. `name` for the requested `city.name`
    paths: Vec<String>,

    /// Position of each path among the requested columns
    indices: Vec<usize>,
}

impl<'a> Write<'a> {
    pub(crate) fn new(schema: &'a Schema, table: &'a Table, columns: &[&str]) -> Result<Write<'a>> {
        if schema.is_view(&table.name) {
            return Err(Error::incorrect_table_definition(
                &table.name,
                "views are read-only",
            ));
        }

        let columns: Vec<String> = if columns.is_empty() {
            table.default_columns(schema)
        } else {
            columns.iter().map(|column| column.to_string()).collect()
        };

        let slots = plan(schema, table, &columns)?;

        Ok(Write {
            schema,
            table,
            columns,
            lenient: Lenient::None,
            conditions: vec![],
            slots,
        })
    }

    pub(crate) fn table(&self) -> &'a Table {
        self.table
    }

    pub(crate) fn set_lenient(&mut self, lenient: Lenient) {
        self.lenient = lenient;
    }

    pub(crate) fn add_conditions(&mut self, conditions: &[&str]) -> Result<()> {
        let env = Env::new(self.schema, self.table);
        for src in conditions {
            let ast = Ast::parse(src)?;
            if !ast.params().is_empty() {
                return Err(Error::invalid_statement(format!(
                    "write condition `{src}` cannot take arguments"
                )));
            }
            ast.infer(&env)?;
            self.conditions.push(ast);
        }
        Ok(())
    }

    /// Names of the table columns written, aligned with resolved rows
    pub(crate) fn written_columns(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Direct { column, .. } => column.clone(),
                Slot::Resolved(group) => group.column.clone(),
            })
            .collect()
    }

    /// Resolves foreign keys, checks the write conditions and executes
    /// `stmt` once per row. Returns, per input row, the first value of the
    /// row the statement returned.
    pub(crate) fn run(
        &self,
        exec: &mut dyn Executor,
        stmt: impl Into<sql::Statement>,
        rows: &[Row],
    ) -> Result<Vec<Option<Value>>> {
        let stmt = stmt.into();
        let returning = stmt.returns_rows();
        let flavor = exec.flavor()?;

        for (i, row) in rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(Error::invalid_statement(format!(
                    "row {i} has {} value(s), expected {} ({})",
                    row.len(),
                    self.columns.len(),
                    self.columns.join(", ")
                )));
            }
        }

        let resolved = self.resolve(exec, rows)?;
        self.validate(exec, flavor, &resolved)?;

        let query = Query::render(stmt, flavor);
        let columns = self.written_columns();
        let args = resolved
            .iter()
            .map(|row| query.bind_columns(&columns, row))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(table = %self.table.name, rows = args.len(), "write");

        let written = exec.execute_many(&query.sql, &args, returning)?;
        if !returning {
            return Ok(vec![None; rows.len()]);
        }

        Ok(written
            .into_iter()
            .map(|row| {
                row.and_then(|row| row.into_iter().next())
                    .and_then(Value::into_option)
            })
            .collect())
    }

    /// Replaces natural-key values with foreign key identifiers. Fails
    /// before anything is written when a value cannot be resolved.
    fn resolve(&self, exec: &mut dyn Executor, rows: &[Row]) -> Result<Vec<Row>> {
        let mut ret: Vec<Row> = rows
            .iter()
            .map(|_| Vec::with_capacity(self.slots.len()))
            .collect();

        for slot in &self.slots {
            match slot {
                Slot::Direct { index, .. } => {
                    for (dst, row) in ret.iter_mut().zip(rows) {
                        dst.push(row[*index].clone());
                    }
                }
                Slot::Resolved(group) => {
                    let ids = self.resolve_group(exec, group, rows)?;
                    for (dst, id) in ret.iter_mut().zip(ids) {
                        dst.push(id);
                    }
                }
            }
        }

        Ok(ret)
    }

    fn resolve_group(
        &self,
        exec: &mut dyn Executor,
        group: &Group<'a>,
        rows: &[Row],
    ) -> Result<Vec<Value>> {
        let keys: Vec<Row> = rows
            .iter()
            .map(|row| group.indices.iter().map(|i| row[*i].clone()).collect())
            .collect();

        let distinct: IndexSet<&Row> = keys.iter().filter(|key| !is_null_key(key)).collect();
        let cache_key = (group.target.name.clone(), group.paths.clone());
        let mut found: HashMap<Row, Value> = HashMap::new();

        if let Some(cache) = exec.fk_cache()? {
            let cache = cache.resolver(&cache_key);
            for key in &distinct {
                if let Some(id) = cache.get(key) {
                    found.insert((*key).clone(), id);
                }
            }
        }

        let missing: Vec<Row> = distinct
            .iter()
            .filter(|key| !found.contains_key(**key))
            .map(|key| (*key).clone())
            .collect();

        if !missing.is_empty() {
            let query = group.resolver(self.schema)?.to_query(exec.flavor()?)?;
            let args = missing
                .iter()
                .map(|key| query.bind(key))
                .collect::<Result<Vec<_>>>()?;

            tracing::debug!(
                table = %self.table.name,
                column = %group.column,
                keys = missing.len(),
                "resolving foreign keys"
            );

            let ids = exec.execute_many(&query.sql, &args, true)?;

            let mut hits = vec![];
            for (key, row) in missing.into_iter().zip(ids) {
                let id = row
                    .and_then(|row| row.into_iter().next())
                    .and_then(Value::into_option);
                if let Some(id) = id {
                    hits.push((key.clone(), id.clone()));
                    found.insert(key, id);
                }
            }

            if let Some(cache) = exec.fk_cache()? {
                let cache = cache.resolver(&cache_key);
                for (key, id) in hits {
                    cache.insert(key, id);
                }
            }
        }

        let lenient = self.is_lenient(group);
        let mut ret = Vec::with_capacity(keys.len());

        for key in &keys {
            if is_null_key(key) {
                ret.push(Value::Null);
                continue;
            }

            match found.get(key) {
                Some(id) => ret.push(id.clone()),
                None if lenient => ret.push(Value::Null),
                None => {
                    return Err(Error::unresolved_foreign_key(
                        &self.table.name,
                        &group.column,
                        key,
                    ))
                }
            }
        }

        Ok(ret)
    }

    fn is_lenient(&self, group: &Group<'_>) -> bool {
        match &self.lenient {
            Lenient::None => false,
            Lenient::All => true,
            Lenient::Columns(columns) => columns.iter().any(|column| {
                column == &group.column
                    || group
                        .paths
                        .iter()
                        .any(|path| column == &format!("{}.{path}", group.column))
            }),
        }
    }

    /// Evaluates the write conditions against every row, before any row is
    /// written.
    fn validate(&self, exec: &mut dyn Executor, flavor: Flavor, rows: &[Row]) -> Result<()> {
        if self.conditions.is_empty() || rows.is_empty() {
            return Ok(());
        }

        let columns = self.written_columns();
        let mut env = Env::new(self.schema, self.table);

        let mut checks = vec![];
        for ast in &self.conditions {
            let mut check = Sql::text("CASE WHEN NOT (");
            check.append(ast.to_sql(&mut env, flavor)?);
            check.push_str(") THEN 1 ELSE 0 END");
            checks.push(check);
        }

        let source = columns
            .iter()
            .map(|column| {
                let ty = self.table.resolve_column(column)?;
                Ok((column.clone(), ty))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = sql::Select::new(sql::Source::Row {
            columns: source,
            alias: self.table.name.clone(),
        });
        stmt.columns = checks;
        stmt.joins = env.joins().to_vec();

        let query = Query::render(stmt, flavor);

        for (i, row) in rows.iter().enumerate() {
            let args = query.bind_columns(&columns, row)?;
            let result = exec.execute(&query.sql, &args)?;
            let Some(flags) = result.into_iter().next() else {
                continue;
            };

            for (ast, flag) in self.conditions.iter().zip(flags) {
                if flag.as_bool() == Some(true) {
                    return Err(Error::validation(&self.table.name, ast.as_str(), i));
                }
            }
        }

        Ok(())
    }
}

impl Group<'_> {
    /// Select returning the primary key of the target row matching every
    /// path
    fn resolver<'s>(&'s self, schema: &'s Schema) -> Result<super::Select<'s>> {
        let pk = self.target.primary_key.as_deref().ok_or_else(|| {
            Error::incorrect_table_definition(
                &self.target.name,
                "referenced by a foreign key but has no primary key",
            )
        })?;

        let conditions: Vec<String> = self
            .paths
            .iter()
            .map(|path| format!("(= {path} {{}})"))
            .collect();
        let conditions: Vec<&str> = conditions.iter().map(String::as_str).collect();

        TableRef::new(schema, &self.target.name)?
            .select(&[pk])?
            .filter(&conditions)
    }
}

/// Returns `true` when every natural-key value is null: the reference is
/// null and needs no lookup.
fn is_null_key(key: &Row) -> bool {
    key.iter().all(Value::is_null)
}

/// Splits the requested columns into direct columns and foreign key
/// groups, keyed by their first step.
fn plan<'a>(schema: &'a Schema, table: &'a Table, columns: &[String]) -> Result<Vec<Slot<'a>>> {
    let mut slots: IndexMap<String, Slot<'a>> = IndexMap::new();

    for (index, column) in columns.iter().enumerate() {
        table.path_type(schema, column)?;

        let Some((head, rest)) = column.split_once('.') else {
            if slots.contains_key(column.as_str()) {
                return Err(Error::invalid_statement(format!(
                    "column `{column}` is written twice"
                )));
            }
            slots.insert(
                column.clone(),
                Slot::Direct {
                    column: column.clone(),
                    index,
                },
            );
            continue;
        };

        let Some(target) = table.foreign_keys.get(head) else {
            return Err(Error::unknown_reference(format!(
                "`{head}` is not a foreign key of table `{}`",
                table.name
            )));
        };

        let target = schema.table(target)?;
        let slot = slots.entry(head.to_string()).or_insert_with(|| {
            Slot::Resolved(Group {
                column: head.to_string(),
                target,
                paths: vec![],
                indices: vec![],
            })
        });

        match slot {
            Slot::Resolved(group) => {
                group.paths.push(rest.to_string());
                group.indices.push(index);
            }
            Slot::Direct { .. } => {
                return Err(Error::invalid_statement(format!(
                    "column `{head}` is written both directly and through `{column}`"
                )));
            }
        }
    }

    Ok(slots.into_values().collect())
}
