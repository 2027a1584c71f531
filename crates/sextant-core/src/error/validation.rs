use super::Error;

/// Error when a row violates a write-time condition.
#[derive(Debug)]
pub(super) struct ValidationError {
    table: Box<str>,
    condition: Box<str>,
    row: usize,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "row {} violates condition `{}` on table `{}`",
            self.row, self.condition, self.table
        )
    }
}

impl Error {
    /// Creates a validation error for the row at index `row` of a batch.
    pub fn validation(table: impl Into<String>, condition: impl Into<String>, row: usize) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            table: table.into().into(),
            condition: condition.into().into(),
            row,
        }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Validation(_))
    }
}
