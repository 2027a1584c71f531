use super::Error;

/// Error when an expression string cannot be parsed.
///
/// This covers unbalanced parentheses, trailing tokens after a complete
/// expression, unterminated string literals and empty input.
#[derive(Debug)]
pub(super) struct ParseError {
    message: Box<str>,
}

impl std::error::Error for ParseError {}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl Error {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Parse(ParseError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Parse(_))
    }
}
