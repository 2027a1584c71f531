mod catalog;

mod value;
use value::Value;

use rusqlite::Connection as RusqliteConnection;
use sextant_core::{
    driver::{Catalog, Connection},
    stmt::{Row, Value as CoreValue},
    Error, Flavor, Result,
};

use std::path::{Path, PathBuf};

/// SQLite connection
#[derive(Debug)]
pub struct Sqlite {
    connection: RusqliteConnection,
    path: Option<PathBuf>,
}

impl Sqlite {
    /// Opens the database designated by a `sqlite://<path>` URL. An empty
    /// path or `:memory:` opens a private in-memory database.
    pub fn connect(url: &str) -> Result<Sqlite> {
        let Some(location) = url.strip_prefix("sqlite:") else {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url}"
            )));
        };
        let location = location.strip_prefix("//").unwrap_or(location);

        if location.is_empty() || location == ":memory:" {
            Sqlite::in_memory()
        } else {
            Sqlite::open(location)
        }
    }

    pub fn in_memory() -> Result<Sqlite> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Sqlite::init(connection, None)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Sqlite> {
        let path = path.as_ref().to_path_buf();
        let connection = RusqliteConnection::open(&path).map_err(Error::driver)?;
        Sqlite::init(connection, Some(path))
    }

    /// Location of the database file, `None` in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init(connection: RusqliteConnection, path: Option<PathBuf>) -> Result<Sqlite> {
        connection
            .execute_batch("PRAGMA foreign_keys = 1")
            .map_err(Error::driver)?;

        tracing::debug!(path = ?path, "sqlite connection opened");

        Ok(Sqlite { connection, path })
    }
}

impl Connection for Sqlite {
    fn flavor(&self) -> Flavor {
        Flavor::Sqlite
    }

    fn execute(&mut self, sql: &str, args: &[CoreValue]) -> Result<Vec<Row>> {
        let mut stmt = self.connection.prepare_cached(sql).map_err(Error::driver)?;
        let params = rusqlite::params_from_iter(args.iter().map(Value));

        let width = stmt.column_count();
        if width == 0 {
            stmt.execute(params).map_err(Error::driver)?;
            return Ok(vec![]);
        }

        let mut rows = stmt.query(params).map_err(Error::driver)?;
        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver)? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                let value = row.get_ref(index).map_err(Error::driver)?;
                values.push(Value::from_sql(value));
            }
            ret.push(values);
        }

        Ok(ret)
    }

    fn catalog(&mut self) -> Result<Catalog> {
        catalog::load(&self.connection)
    }
}
