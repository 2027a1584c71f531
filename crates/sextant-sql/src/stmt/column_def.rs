use sextant_core::schema::{Table, Type};

/// A column definition, as found in `CREATE TABLE` and `ADD COLUMN`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: Type,
    pub not_null: bool,

    /// SQL expression
    pub default: Option<String>,

    /// Inline `REFERENCES` clause
    pub references: Option<Reference>,
}

/// Target of a foreign key constraint
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub table: String,
    pub column: String,
}

impl ColumnDef {
    /// Builds the definition of a declared column, with an optional inline
    /// foreign key constraint.
    pub fn from_schema(
        table: &Table,
        column: &str,
        ty: Type,
        reference: Option<Reference>,
    ) -> ColumnDef {
        ColumnDef {
            name: column.to_string(),
            ty,
            not_null: table.is_not_null(column),
            default: table.default.get(column).cloned(),
            references: reference,
        }
    }
}
