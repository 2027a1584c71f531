use super::Query;
use crate::Executor;

use sextant_core::{
    stmt::{Ast, Env, Sql, Value},
    Error, Flavor, Result,
};
use sextant_sql::stmt as sql;

/// Deletes the rows of one table matching every condition.
#[derive(Debug, Clone)]
pub struct Delete<'a> {
    env: Env<'a>,
    filter: Vec<Ast>,
}

impl<'a> Delete<'a> {
    pub(crate) fn new(env: Env<'a>) -> Delete<'a> {
        Delete {
            env,
            filter: vec![],
        }
    }

    pub fn filter(&self, conditions: &[&str]) -> Result<Delete<'a>> {
        let mut ret = self.clone();
        for src in conditions {
            let ast = Ast::parse(src)?;
            ast.infer(&ret.env)?;
            ret.filter.push(ast);
        }
        Ok(ret)
    }

    /// Renders the statement for `flavor`.
    ///
    /// Conditions reaching other tables are evaluated in a sub-query
    /// selecting the primary keys of the rows to delete.
    pub fn to_query(&self, flavor: Flavor) -> Result<Query> {
        let mut env = self.env.clone();
        let filter = self
            .filter
            .iter()
            .map(|ast| ast.to_sql(&mut env, flavor))
            .collect::<Result<Vec<_>>>()?;

        let table = env.table();

        if env.joins().is_empty() {
            return Ok(Query::render(
                sql::Delete {
                    table: table.name.clone(),
                    filter: sql::DeleteFilter::Where(filter),
                },
                flavor,
            ));
        }

        let key = table.primary_key.clone().ok_or_else(|| {
            Error::incorrect_table_definition(
                &table.name,
                "conditions on related tables need a primary key",
            )
        })?;

        let mut query = sql::Select::from_table(&table.name);
        query.columns = vec![Sql::text(format!(
            "{}.{}",
            flavor.quote_ident(&table.name),
            flavor.quote_ident(&key)
        ))];
        query.joins = env.joins().to_vec();
        query.filter = filter;

        Ok(Query::render(
            sql::Delete {
                table: table.name.clone(),
                filter: sql::DeleteFilter::KeyIn {
                    key,
                    query: Box::new(query),
                },
            },
            flavor,
        ))
    }

    pub fn execute(&self, exec: &mut dyn Executor, args: &[Value]) -> Result<()> {
        let query = self.to_query(exec.flavor()?)?;
        let args = query.bind(args)?;
        exec.execute(&query.sql, &args)?;
        Ok(())
    }
}
