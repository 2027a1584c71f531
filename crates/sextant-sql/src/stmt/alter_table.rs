use super::{ColumnDef, Reference, Statement};

/// `ALTER TABLE .. ADD COLUMN ..`
#[derive(Debug, Clone, PartialEq)]
pub struct AddColumn {
    pub table: String,
    pub column: ColumnDef,
}

/// `ALTER TABLE .. ADD CONSTRAINT .. FOREIGN KEY ..`, used when the
/// referenced table did not exist when the column was created.
#[derive(Debug, Clone, PartialEq)]
pub struct AddForeignKey {
    pub table: String,
    pub column: String,
    pub references: Reference,
}

impl AddForeignKey {
    /// Name of the constraint
    pub fn name(&self) -> String {
        format!("{}_{}_fkey", self.table, self.column)
    }
}

impl From<AddColumn> for Statement {
    fn from(value: AddColumn) -> Self {
        Self::AddColumn(value)
    }
}

impl From<AddForeignKey> for Statement {
    fn from(value: AddForeignKey) -> Self {
        Self::AddForeignKey(value)
    }
}
