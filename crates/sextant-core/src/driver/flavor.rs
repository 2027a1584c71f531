use super::Capability;
use crate::{Error, Result};

use std::fmt;

/// A supported database product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Postgresql,
    Sqlite,
    Mssql,
    Duckdb,
}

impl Flavor {
    /// Maps a data source URL scheme to a flavor.
    pub fn from_scheme(scheme: &str) -> Result<Flavor> {
        match scheme {
            "postgresql" | "postgres" => Ok(Flavor::Postgresql),
            "sqlite" => Ok(Flavor::Sqlite),
            "mssql" | "sqlserver" => Ok(Flavor::Mssql),
            "duckdb" => Ok(Flavor::Duckdb),
            _ => Err(Error::invalid_connection_url(format!(
                "unsupported scheme `{scheme}`"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Postgresql => "postgresql",
            Flavor::Sqlite => "sqlite",
            Flavor::Mssql => "mssql",
            Flavor::Duckdb => "duckdb",
        }
    }

    pub fn capability(self) -> &'static Capability {
        match self {
            Flavor::Postgresql => &Capability::POSTGRESQL,
            Flavor::Sqlite => &Capability::SQLITE,
            Flavor::Mssql => &Capability::MSSQL,
            Flavor::Duckdb => &Capability::DUCKDB,
        }
    }

    /// Quotes an identifier. Embedded quote characters are doubled.
    pub fn quote_ident(self, name: &str) -> String {
        match self {
            Flavor::Mssql => format!("[{}]", name.replace(']', "]]")),
            _ => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    pub fn begin_statement(self) -> &'static str {
        match self {
            Flavor::Mssql => "BEGIN TRANSACTION",
            _ => "BEGIN",
        }
    }

    pub fn commit_statement(self) -> &'static str {
        "COMMIT"
    }

    pub fn rollback_statement(self) -> &'static str {
        "ROLLBACK"
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
