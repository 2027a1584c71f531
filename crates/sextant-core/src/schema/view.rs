use super::{Table, Type};

/// A read-only relation defined by a SQL query.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Column layout, used to compile expressions against the view. A view
    /// has no primary key, foreign keys or natural key.
    pub table: Table,

    /// The `SELECT` statement defining the view
    pub definition: String,
}

impl View {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> View {
        View {
            table: Table::new(name).primary_key(None),
            definition: definition.into(),
        }
    }

    pub fn column(mut self, name: impl Into<String>, ty: Type) -> View {
        self.table = self.table.column(name, ty);
        self
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }
}
