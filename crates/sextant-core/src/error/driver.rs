use super::Error;

/// Error raised by the database driver, passed through unmodified.
#[derive(Debug)]
pub(super) struct DriverError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)
    }
}

impl Error {
    /// Wraps an error returned by a database driver.
    ///
    /// Usable directly with `map_err`:
    /// `conn.execute(..).map_err(Error::driver)?`.
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Driver(DriverError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error originates from the database driver.
    pub fn is_driver(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Driver(_))
    }
}
