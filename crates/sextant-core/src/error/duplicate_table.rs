use super::Error;

/// Error when a table or view name is registered twice in the same schema.
#[derive(Debug)]
pub(super) struct DuplicateTable {
    name: Box<str>,
}

impl std::error::Error for DuplicateTable {}

impl core::fmt::Display for DuplicateTable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "table `{}` already in schema", self.name)
    }
}

impl Error {
    /// Creates a duplicate table error.
    pub fn duplicate_table(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateTable(DuplicateTable {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate table error.
    pub fn is_duplicate_table(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::DuplicateTable(_))
    }
}
