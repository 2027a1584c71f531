use super::{ColumnDef, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    /// Name of the table
    pub name: String,

    pub primary_key: Option<PrimaryKey>,

    /// Column definitions, primary key excluded
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryKey {
    /// Auto-incrementing integer key. `sequence` names the sequence the
    /// values are drawn from, for flavors without auto-incrementing types.
    Surrogate {
        name: String,
        sequence: Option<String>,
    },

    /// Key column with a caller-chosen type
    Custom(ColumnDef),
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
