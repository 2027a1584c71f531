use sextant_core::{Connection, Error, Flavor, Result};

/// Opens a connection from a `<flavor>://<location>` data source URL.
///
/// Only the drivers enabled through crate features are available.
pub fn connect(url: &str) -> Result<Box<dyn Connection>> {
    let Some((scheme, _)) = url.split_once(':') else {
        return Err(Error::invalid_connection_url(format!(
            "missing scheme; url={url}"
        )));
    };

    match Flavor::from_scheme(scheme)? {
        Flavor::Sqlite => connect_sqlite(url),
        Flavor::Postgresql => connect_postgresql(url),
        flavor => Err(Error::invalid_connection_url(format!(
            "no bundled driver for `{flavor}`; url={url}"
        ))),
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Box<dyn Connection>> {
    let conn = sextant_driver_sqlite::Sqlite::connect(url)?;
    Ok(Box::new(conn))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Box<dyn Connection>> {
    Err(Error::invalid_connection_url("`sqlite` feature not enabled"))
}

#[cfg(feature = "postgresql")]
fn connect_postgresql(url: &str) -> Result<Box<dyn Connection>> {
    let conn = sextant_driver_postgresql::PostgreSQL::connect(url)?;
    Ok(Box::new(conn))
}

#[cfg(not(feature = "postgresql"))]
fn connect_postgresql(_url: &str) -> Result<Box<dyn Connection>> {
    Err(Error::invalid_connection_url("`postgresql` feature not enabled"))
}
