use super::Error;

/// Error when a name does not resolve.
///
/// Raised for unknown operators and aggregates, unknown columns, unknown
/// tables and path steps that are neither a foreign key nor a one-to-many
/// relation of the table they are applied to.
#[derive(Debug)]
pub(super) struct UnknownReference {
    message: Box<str>,
}

impl std::error::Error for UnknownReference {}

impl core::fmt::Display for UnknownReference {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown reference: {}", self.message)
    }
}

impl Error {
    /// Creates an unknown reference error.
    pub fn unknown_reference(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownReference(UnknownReference {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown reference error.
    pub fn is_unknown_reference(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::UnknownReference(_))
    }
}
