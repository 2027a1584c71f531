use super::Error;

/// Error when an operator or aggregate is applied to an operand of the wrong
/// type family, e.g. `(sum name)` over a text column.
#[derive(Debug)]
pub(super) struct TypeMismatch {
    operator: Box<str>,
    expected: Box<str>,
    found: Box<str>,
}

impl std::error::Error for TypeMismatch {}

impl core::fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "type mismatch: `{}` expects {} operand, found {}",
            self.operator, self.expected, self.found
        )
    }
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        operator: impl Into<String>,
        expected: impl Into<String>,
        found: impl core::fmt::Display,
    ) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatch {
            operator: operator.into().into(),
            expected: expected.into().into(),
            found: found.to_string().into(),
        }))
    }

    /// Returns `true` if this error is a type mismatch error.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::TypeMismatch(_))
    }
}
