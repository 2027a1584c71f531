use super::{Direction, Query};
use crate::Executor;

use sextant_core::{
    schema::Type,
    stmt::{Ast, Env, Row, Sql, Value},
    Flavor, Result,
};
use sextant_sql::stmt as sql;

/// A query over one table.
///
/// Extending a select returns a new value and leaves the receiver
/// untouched. Expressions are checked as they are added; SQL is rendered
/// by [`Select::to_query`], compiling every expression in order against a
/// fresh copy of the environment.
#[derive(Debug, Clone)]
pub struct Select<'a> {
    env: Env<'a>,
    columns: Vec<Ast>,
    filter: Vec<Ast>,
    group_by: Vec<Ast>,
    order_by: Vec<(Ast, Direction)>,
    limit: Option<u64>,
    offset: Option<u64>,
    distinct: bool,
}

impl<'a> Select<'a> {
    pub(crate) fn new(env: Env<'a>) -> Select<'a> {
        Select {
            env,
            columns: vec![],
            filter: vec![],
            group_by: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
            distinct: false,
        }
    }

    /// Adds selected columns.
    pub fn select(&self, columns: &[&str]) -> Result<Select<'a>> {
        let mut ret = self.clone();
        for src in columns {
            ret.columns.push(ret.check(src)?);
        }
        Ok(ret)
    }

    /// Adds conditions. Conditions are combined with `AND`.
    pub fn filter(&self, conditions: &[&str]) -> Result<Select<'a>> {
        let mut ret = self.clone();
        for src in conditions {
            ret.filter.push(ret.check(src)?);
        }
        Ok(ret)
    }

    /// Adds grouping expressions. Without any, a select mixing aggregates
    /// and plain columns groups by the plain columns.
    pub fn group_by(&self, exprs: &[&str]) -> Result<Select<'a>> {
        let mut ret = self.clone();
        for src in exprs {
            ret.group_by.push(ret.check(src)?);
        }
        Ok(ret)
    }

    pub fn order_by(&self, expr: &str, direction: Direction) -> Result<Select<'a>> {
        let mut ret = self.clone();
        let ast = ret.check(expr)?;
        ret.order_by.push((ast, direction));
        Ok(ret)
    }

    pub fn limit(&self, limit: u64) -> Select<'a> {
        let mut ret = self.clone();
        ret.limit = Some(limit);
        ret
    }

    pub fn offset(&self, offset: u64) -> Select<'a> {
        let mut ret = self.clone();
        ret.offset = Some(offset);
        ret
    }

    pub fn distinct(&self) -> Select<'a> {
        let mut ret = self.clone();
        ret.distinct = true;
        ret
    }

    pub fn env(&self) -> &Env<'a> {
        &self.env
    }

    /// Source text of the selected columns
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(Ast::as_str).collect()
    }

    /// Name and inferred type of every selected column
    pub fn dtypes(&self) -> Result<Vec<(String, Type)>> {
        self.columns
            .iter()
            .map(|ast| Ok((ast.as_str().to_string(), ast.infer(&self.env)?)))
            .collect()
    }

    /// Number of arguments expected by `execute`
    pub fn arity(&self) -> usize {
        self.columns
            .iter()
            .chain(&self.filter)
            .chain(&self.group_by)
            .chain(self.order_by.iter().map(|(ast, _)| ast))
            .map(|ast| ast.params().len())
            .sum()
    }

    /// Renders the statement for `flavor`.
    pub fn to_query(&self, flavor: Flavor) -> Result<Query> {
        let source = sql::Source::Table(self.env.table().name.clone());
        let (stmt, slots) = self.to_statement(flavor, source)?;
        Ok(Query::render_with_slots(stmt, flavor, &slots))
    }

    /// Builds the statement along with the argument index of each
    /// placeholder, in rendering order.
    fn to_statement(&self, flavor: Flavor, source: sql::Source) -> Result<(sql::Select, Vec<usize>)> {
        let mut env = self.env.clone();

        let columns = compile(&self.columns, &mut env, flavor)?;
        let filter = compile(&self.filter, &mut env, flavor)?;
        let mut group_by = compile(&self.group_by, &mut env, flavor)?;

        let mut order_by = vec![];
        for (ast, direction) in &self.order_by {
            order_by.push((ast.to_sql(&mut env, flavor)?, *direction));
        }

        // Arguments are taken left to right across columns, filter,
        // explicit grouping and ordering.
        let mut next = 0;
        let mut take = |sql: &Sql| -> Vec<usize> {
            let count = sql.params().count();
            next += count;
            (next - count..next).collect()
        };

        let column_slots: Vec<Vec<usize>> = columns.iter().map(&mut take).collect();
        let filter_slots: Vec<usize> = filter.iter().flat_map(&mut take).collect();
        let mut group_slots: Vec<usize> = group_by.iter().flat_map(&mut take).collect();
        let order_slots: Vec<usize> = order_by.iter().flat_map(|(sql, _)| take(sql)).collect();

        if group_by.is_empty() && self.columns.iter().any(Ast::is_aggregate) {
            // Implicit grouping repeats the plain columns, so their
            // placeholders take the column's arguments again.
            for ((ast, sql), slots) in self.columns.iter().zip(&columns).zip(&column_slots) {
                if !ast.is_aggregate() {
                    group_by.push(sql.clone());
                    group_slots.extend(slots);
                }
            }
        }

        let slots = column_slots
            .into_iter()
            .flatten()
            .chain(filter_slots)
            .chain(group_slots)
            .chain(order_slots)
            .collect();

        let mut stmt = sql::Select::new(source);
        stmt.distinct = self.distinct;
        stmt.columns = columns;
        stmt.joins = env.joins().to_vec();
        stmt.filter = filter;
        stmt.group_by = group_by;
        stmt.order_by = order_by;
        stmt.limit = self.limit;
        stmt.offset = self.offset;
        Ok((stmt, slots))
    }

    /// Runs the query with positional arguments, one per placeholder.
    pub fn execute(&self, exec: &mut dyn Executor, args: &[Value]) -> Result<Vec<Row>> {
        let query = self.to_query(exec.flavor()?)?;
        let args = query.bind(args)?;
        exec.execute(&query.sql, &args)
    }

    /// Runs the query once per argument row.
    pub fn execute_many(&self, exec: &mut dyn Executor, rows: &[Row]) -> Result<Vec<Vec<Row>>> {
        let query = self.to_query(exec.flavor()?)?;

        let mut ret = vec![];
        for args in rows {
            let args = query.bind(args)?;
            ret.push(exec.execute(&query.sql, &args)?);
        }
        Ok(ret)
    }

    /// Parses an expression and checks it against the schema.
    fn check(&self, src: &str) -> Result<Ast> {
        let ast = Ast::parse(src)?;
        ast.infer(&self.env)?;
        Ok(ast)
    }
}

fn compile(asts: &[Ast], env: &mut Env<'_>, flavor: Flavor) -> Result<Vec<Sql>> {
    asts.iter().map(|ast| ast.to_sql(env, flavor)).collect()
}
