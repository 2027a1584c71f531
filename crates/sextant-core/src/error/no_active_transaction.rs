use super::Error;

/// Error when a statement is executed while no transaction is active in the
/// scope it was executed against.
#[derive(Debug)]
pub(super) struct NoActiveTransaction;

impl std::error::Error for NoActiveTransaction {}

impl core::fmt::Display for NoActiveTransaction {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("no active transaction")
    }
}

impl Error {
    /// Creates a no active transaction error.
    pub fn no_active_transaction() -> Error {
        Error::from(super::ErrorKind::NoActiveTransaction(NoActiveTransaction))
    }

    /// Returns `true` if this error is a no active transaction error.
    pub fn is_no_active_transaction(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::NoActiveTransaction(_))
    }
}
