use super::Error;

/// Error when a table definition is inconsistent with the rest of its
/// schema.
///
/// This occurs when:
/// - A foreign key targets a table that is not registered
/// - A foreign key targets a table without a primary key
/// - A natural key, not-null or default entry names an undeclared column
/// - A column type string is not recognized
/// - A one-to-many relation does not resolve back to the table
#[derive(Debug)]
pub(super) struct IncorrectTableDefinition {
    table: Box<str>,
    message: Box<str>,
}

impl std::error::Error for IncorrectTableDefinition {}

impl core::fmt::Display for IncorrectTableDefinition {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "incorrect definition for table `{}`: {}",
            self.table, self.message
        )
    }
}

impl Error {
    /// Creates an incorrect table definition error.
    pub fn incorrect_table_definition(
        table: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::IncorrectTableDefinition(
            IncorrectTableDefinition {
                table: table.into().into(),
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an incorrect table definition error.
    pub fn is_incorrect_table_definition(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::IncorrectTableDefinition(_))
    }
}
