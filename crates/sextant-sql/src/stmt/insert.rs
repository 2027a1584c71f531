use super::Statement;

/// A single-row insert. Each column value is a placeholder named after the
/// column; the statement is executed once per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,

    pub columns: Vec<String>,

    pub on_conflict: Option<OnConflict>,

    /// Column to return for every written row
    pub returning: Option<String>,
}

/// Conflict handling turning an insert into an upsert
#[derive(Debug, Clone, PartialEq)]
pub struct OnConflict {
    /// Columns of the unique constraint detecting the conflict
    pub key: Vec<String>,

    /// Columns overwritten with the new values. When empty, conflicting
    /// rows are left untouched and are not returned.
    pub update: Vec<String>,
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
