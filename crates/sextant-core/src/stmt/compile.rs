use super::{Aggregate, Ast, Builtin, Env, Literal, Node, Sql, Token};
use crate::{driver::Flavor, Error, Result};

impl Ast {
    /// Compiles the expression to a SQL fragment.
    ///
    /// Relational paths are resolved through `env`, which records the joins
    /// they require. Every list except the outermost one is parenthesized;
    /// `or` and arithmetic operators also parenthesize themselves.
    pub fn to_sql(&self, env: &mut Env<'_>, flavor: Flavor) -> Result<Sql> {
        compile_node(self.root(), env, flavor, true)
    }
}

impl Env<'_> {
    /// Compiles a column reference. `a.b.c` designates column `c` of the
    /// relation reached through `a.b`.
    pub fn reference(&mut self, path: &str, flavor: Flavor) -> Result<String> {
        let steps: Vec<&str> = path.split('.').collect();
        let Some((column, relations)) = steps.split_last() else {
            return Err(Error::unknown_reference("empty column reference"));
        };

        let alias = self.resolve(relations)?;
        self.table()
            .follow(self.schema(), relations)?
            .resolve_column(column)?;

        Ok(format!(
            "{}.{}",
            flavor.quote_ident(&alias),
            flavor.quote_ident(column)
        ))
    }
}

fn compile_node(node: &Node, env: &mut Env<'_>, flavor: Flavor, top: bool) -> Result<Sql> {
    let items = match node {
        Node::Token(token) => return compile_token(token, env, flavor),
        Node::List(items) => items,
    };

    let Some((head, tail)) = items.split_first() else {
        return Err(Error::parse("empty list `()`"));
    };

    let sql = match head {
        Node::Token(Token::Builtin(op)) => builtin(*op, compile_args(tail, env, flavor)?, flavor),
        Node::Token(Token::Aggregate(op)) => {
            aggregate(*op, compile_args(tail, env, flavor)?, flavor)?
        }
        _ if tail.is_empty() => compile_node(head, env, flavor, false)?,
        Node::Token(token) => {
            return Err(Error::unknown_reference(format!(
                "{} is not an operator",
                describe(token)
            )))
        }
        Node::List(_) => {
            return Err(Error::unknown_reference(
                "a list cannot be used as an operator",
            ))
        }
    };

    Ok(if top { sql } else { sql.wrap() })
}

fn compile_args(args: &[Node], env: &mut Env<'_>, flavor: Flavor) -> Result<Vec<Sql>> {
    args.iter()
        .map(|arg| compile_node(arg, env, flavor, false))
        .collect()
}

fn compile_token(token: &Token, env: &mut Env<'_>, flavor: Flavor) -> Result<Sql> {
    Ok(match token {
        Token::Literal(literal) => Sql::text(literal_sql(literal, flavor)),
        Token::Param(param) => Sql::param(param.clone()),
        Token::Var(path) => Sql::text(env.reference(path, flavor)?),
        Token::Builtin(_) | Token::Aggregate(_) => {
            return Err(Error::unknown_reference(format!(
                "{} must be the head of a list",
                describe(token)
            )))
        }
    })
}

pub(crate) fn literal_sql(literal: &Literal, flavor: Flavor) -> String {
    match literal {
        Literal::Int(v) => v.to_string(),
        Literal::Float(v) => format!("{v:?}"),
        Literal::Str(s) => format!("'{}'", s.replace('\'', "''")),
        Literal::Bool(v) if flavor == Flavor::Mssql => (if *v { "1" } else { "0" }).to_string(),
        Literal::Bool(v) => v.to_string(),
        Literal::Null => "NULL".to_string(),
    }
}

fn builtin(op: Builtin, mut args: Vec<Sql>, flavor: Flavor) -> Sql {
    use Builtin::*;

    let infix = |args: Vec<Sql>, sep: &str| Sql::join(args, sep);

    match op {
        Eq => infix(args, " = "),
        Ne => infix(args, " != "),
        Lt => infix(args, " < "),
        Le => infix(args, " <= "),
        Gt => infix(args, " > "),
        Ge => infix(args, " >= "),
        Is => infix(args, " IS "),
        Like => infix(args, " LIKE "),
        // SQLite LIKE is already case-insensitive, SQL Server depends on
        // the collation
        Ilike if matches!(flavor, Flavor::Sqlite | Flavor::Mssql) => infix(args, " LIKE "),
        Ilike => infix(args, " ILIKE "),
        And => infix(args, " AND "),
        Or => infix(args, " OR ").wrap(),
        Not => {
            let mut ret = Sql::text("NOT ");
            ret.append(args.remove(0));
            ret
        }
        Sub if args.len() == 1 => {
            let mut ret = Sql::text("-");
            ret.append(args.remove(0));
            ret.wrap()
        }
        Add => infix(args, " + ").wrap(),
        Sub => infix(args, " - ").wrap(),
        Mul => infix(args, " * ").wrap(),
        Div => infix(args, " / ").wrap(),
        Concat if flavor == Flavor::Mssql => call("CONCAT", args),
        Concat => infix(args, " || "),
        Strftime => call("strftime", args),
        Extract => {
            let mut ret = Sql::text("EXTRACT(");
            let mut args = args.into_iter();
            ret.append(args.next().unwrap_or_default());
            ret.push_str(" FROM ");
            ret.append(args.next().unwrap_or_default());
            ret.push_str(")");
            ret
        }
        In => {
            let value = args.remove(0);
            let mut ret = value;
            ret.push_str(" IN ");
            ret.append(Sql::join(args, ", ").wrap());
            ret
        }
    }
}

fn aggregate(op: Aggregate, mut args: Vec<Sql>, flavor: Flavor) -> Result<Sql> {
    use Aggregate::*;
    use Flavor::*;

    let name = match (op, flavor) {
        (Count, _) if args.is_empty() => return Ok(Sql::text("count(*)")),
        (Min | Max | Sum | Avg | Count, _) => op.name(),

        (Every, Postgresql) => "every",
        (Every | BoolAnd, Duckdb | Postgresql) => "bool_and",
        (BoolOr, Duckdb | Postgresql) => "bool_or",
        (Every | BoolAnd, Sqlite | Mssql) => "min",
        (BoolOr, Sqlite | Mssql) => "max",

        (GroupConcat | StringAgg, Sqlite) => "group_concat",
        (GroupConcat | StringAgg, _) => {
            if args.len() == 1 {
                args.push(Sql::text("','"));
            }
            if flavor == Mssql {
                "STRING_AGG"
            } else {
                "string_agg"
            }
        }

        (ArrayAgg, Postgresql | Duckdb) => "array_agg",
        (JsonAgg, Postgresql) => "json_agg",
        (ArrayAgg | JsonAgg, Sqlite | Duckdb) => "json_group_array",
        (JsonObjectAgg, Postgresql) => "json_object_agg",
        (JsonObjectAgg, Sqlite | Duckdb) => "json_group_object",

        (ArrayAgg | JsonAgg | JsonObjectAgg, Mssql) => {
            return Err(Error::unknown_reference(format!(
                "aggregate `{}` is not available on {flavor}",
                op.name()
            )))
        }
    };

    Ok(call(name, args))
}

fn call(name: &str, args: Vec<Sql>) -> Sql {
    let mut ret = Sql::text(name);
    ret.append(Sql::join(args, ", ").wrap());
    ret
}

fn describe(token: &Token) -> String {
    match token {
        Token::Builtin(op) => format!("operator `{}`", op.name()),
        Token::Aggregate(op) => format!("aggregate `{}`", op.name()),
        Token::Literal(literal) => format!("literal `{}`", literal_sql(literal, Flavor::Postgresql)),
        Token::Param(_) => "placeholder".to_string(),
        Token::Var(path) => format!("`{path}`"),
    }
}
