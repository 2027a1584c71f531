use super::Error;

/// Error when a natural-key lookup performed during a write finds no
/// matching row and leniency was not requested for the column.
#[derive(Debug)]
pub(super) struct UnresolvedForeignKey {
    table: Box<str>,
    column: Box<str>,
    values: Box<str>,
}

impl std::error::Error for UnresolvedForeignKey {}

impl core::fmt::Display for UnresolvedForeignKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unable to resolve foreign key `{}.{}` for {}",
            self.table, self.column, self.values
        )
    }
}

impl Error {
    /// Creates an unresolved foreign key error.
    pub fn unresolved_foreign_key(
        table: impl Into<String>,
        column: impl Into<String>,
        values: impl core::fmt::Debug,
    ) -> Error {
        Error::from(super::ErrorKind::UnresolvedForeignKey(UnresolvedForeignKey {
            table: table.into().into(),
            column: column.into().into(),
            values: format!("{values:?}").into(),
        }))
    }

    /// Returns `true` if this error is an unresolved foreign key error.
    pub fn is_unresolved_foreign_key(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::UnresolvedForeignKey(_))
    }
}
