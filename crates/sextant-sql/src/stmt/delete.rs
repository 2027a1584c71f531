use super::{Select, Sql, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub filter: DeleteFilter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteFilter {
    /// Conditions on the table itself, combined with `AND`. Empty deletes
    /// every row.
    Where(Vec<Sql>),

    /// Conditions needing joins: rows whose `key` is returned by `query`
    KeyIn { key: String, query: Box<Select> },
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
