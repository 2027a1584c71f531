use super::{Join, Sql, Statement};

use sextant_core::schema::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub source: Source,

    pub distinct: bool,

    pub columns: Vec<Sql>,

    /// Joins planned while compiling the expressions
    pub joins: Vec<Join>,

    /// Conditions, combined with `AND`
    pub filter: Vec<Sql>,

    pub group_by: Vec<Sql>,

    pub order_by: Vec<(Sql, Direction)>,

    pub limit: Option<u64>,

    pub offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table(String),

    /// A single row of typed placeholders, aliased as `alias`. Used to
    /// evaluate expressions against a row before it is written.
    Row {
        columns: Vec<(String, Type)>,
        alias: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Select {
    pub fn new(source: Source) -> Select {
        Select {
            source,
            distinct: false,
            columns: vec![],
            joins: vec![],
            filter: vec![],
            group_by: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }

    pub fn from_table(table: &str) -> Select {
        Select::new(Source::Table(table.to_string()))
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
