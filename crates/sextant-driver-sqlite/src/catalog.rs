use rusqlite::Connection as RusqliteConnection;
use sextant_core::{
    driver::{Catalog, CatalogColumn, CatalogTable},
    Error, Result,
};

/// Reads tables, views, keys and unique indexes from `sqlite_master` and
/// the table pragmas.
pub(crate) fn load(conn: &RusqliteConnection) -> Result<Catalog> {
    let mut catalog = Catalog::new();

    let mut stmt = conn
        .prepare(
            "SELECT name, type FROM sqlite_master \
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' \
             ORDER BY rowid",
        )
        .map_err(Error::driver)?;

    let objects = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(Error::driver)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver)?;

    for (name, kind) in objects {
        if kind == "view" {
            catalog.views.insert(name);
            continue;
        }
        catalog.add_table(load_table(conn, &name)?);
    }

    Ok(catalog)
}

fn load_table(conn: &RusqliteConnection, name: &str) -> Result<CatalogTable> {
    let mut table = CatalogTable::new(name);
    let quoted = name.replace('"', "\"\"");

    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info(\"{quoted}\")"))
        .map_err(Error::driver)?;
    let mut rows = stmt.query([]).map_err(Error::driver)?;
    while let Some(row) = rows.next().map_err(Error::driver)? {
        let column: String = row.get(1).map_err(Error::driver)?;
        let native_type: String = row.get(2).map_err(Error::driver)?;
        let not_null: bool = row.get(3).map_err(Error::driver)?;
        let default: Option<String> = row.get(4).map_err(Error::driver)?;
        let pk: i64 = row.get(5).map_err(Error::driver)?;

        if pk == 1 {
            table.primary_key = Some(column.clone());
        }

        table.columns.insert(
            column.clone(),
            CatalogColumn {
                name: column,
                native_type,
                not_null,
                default,
            },
        );
    }

    let mut stmt = conn
        .prepare(&format!("PRAGMA foreign_key_list(\"{quoted}\")"))
        .map_err(Error::driver)?;
    let mut rows = stmt.query([]).map_err(Error::driver)?;
    while let Some(row) = rows.next().map_err(Error::driver)? {
        let target: String = row.get(2).map_err(Error::driver)?;
        let column: String = row.get(3).map_err(Error::driver)?;
        table.foreign_keys.insert(column, target);
    }

    let mut stmt = conn
        .prepare(&format!("PRAGMA index_list(\"{quoted}\")"))
        .map_err(Error::driver)?;
    let indexes = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(Error::driver)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver)?;

    for (index, unique, origin) in indexes {
        if !unique || origin == "pk" {
            continue;
        }

        let mut stmt = conn
            .prepare(&format!(
                "PRAGMA index_info(\"{}\")",
                index.replace('"', "\"\"")
            ))
            .map_err(Error::driver)?;
        let columns = stmt
            .query_map([], |row| row.get::<_, Option<String>>(2))
            .map_err(Error::driver)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::driver)?;

        // Expression indexes have no column names
        let Some(columns) = columns.into_iter().collect::<Option<Vec<_>>>() else {
            continue;
        };

        table.unique_indexes.insert(index, columns);
    }

    Ok(table)
}
