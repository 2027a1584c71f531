use super::Statement;

/// `CREATE UNIQUE INDEX`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    /// Name of the index
    pub name: String,

    /// Which table to index
    pub on: String,

    pub columns: Vec<String>,
}

impl Statement {
    /// Unique index over the natural key of a table
    pub fn natural_key_index(table: &str, columns: &[String]) -> Statement {
        CreateIndex {
            name: format!("{table}_idx"),
            on: table.to_string(),
            columns: columns.to_vec(),
        }
        .into()
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
