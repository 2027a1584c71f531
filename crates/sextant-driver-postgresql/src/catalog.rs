use postgres::Client;
use sextant_core::{
    driver::{Catalog, CatalogColumn, CatalogTable},
    Error, Result,
};

const TABLES: &str = "\
SELECT table_name::text, table_type::text
FROM information_schema.tables
WHERE table_schema = current_schema()
ORDER BY table_name";

const COLUMNS: &str = "\
SELECT table_name::text, column_name::text, udt_name::text, is_nullable::text, column_default::text
FROM information_schema.columns
WHERE table_schema = current_schema()
ORDER BY table_name, ordinal_position";

const KEYS: &str = "\
SELECT tc.constraint_type::text, kcu.table_name::text, kcu.column_name::text, ccu.table_name::text
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema
JOIN information_schema.constraint_column_usage ccu
  ON tc.constraint_name = ccu.constraint_name AND tc.table_schema = ccu.table_schema
WHERE tc.table_schema = current_schema()
  AND tc.constraint_type IN ('PRIMARY KEY', 'FOREIGN KEY')";

const UNIQUE_INDEXES: &str = "\
SELECT t.relname::text, i.relname::text, a.attname::text
FROM pg_index ix
JOIN pg_class i ON i.oid = ix.indexrelid
JOIN pg_class t ON t.oid = ix.indrelid
JOIN pg_namespace n ON n.oid = t.relnamespace
JOIN LATERAL unnest(ix.indkey) WITH ORDINALITY AS k(attnum, ord) ON true
JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
WHERE ix.indisunique AND NOT ix.indisprimary AND n.nspname = current_schema()
ORDER BY t.relname, i.relname, k.ord";

/// Reads the tables, views, keys and unique indexes of the current schema.
pub(crate) fn load(client: &mut Client) -> Result<Catalog> {
    let mut catalog = Catalog::new();

    for row in client.query(TABLES, &[]).map_err(Error::driver)? {
        let name: String = row.get(0);
        let kind: String = row.get(1);

        if kind == "VIEW" {
            catalog.views.insert(name);
        } else {
            catalog.add_table(CatalogTable::new(name));
        }
    }

    for row in client.query(COLUMNS, &[]).map_err(Error::driver)? {
        let table: String = row.get(0);
        let Some(table) = catalog.tables.get_mut(&table) else {
            continue;
        };

        let name: String = row.get(1);
        let nullable: String = row.get(3);
        let default: Option<String> = row.get(4);

        table.columns.insert(
            name.clone(),
            CatalogColumn {
                name,
                native_type: row.get(2),
                not_null: nullable == "NO",
                // Serial keys default to a sequence
                default: default.filter(|default| !default.starts_with("nextval(")),
            },
        );
    }

    for row in client.query(KEYS, &[]).map_err(Error::driver)? {
        let kind: String = row.get(0);
        let table: String = row.get(1);
        let Some(table) = catalog.tables.get_mut(&table) else {
            continue;
        };

        let column: String = row.get(2);
        if kind == "PRIMARY KEY" {
            table.primary_key = Some(column);
        } else {
            table.foreign_keys.insert(column, row.get(3));
        }
    }

    for row in client.query(UNIQUE_INDEXES, &[]).map_err(Error::driver)? {
        let table: String = row.get(0);
        let Some(table) = catalog.tables.get_mut(&table) else {
            continue;
        };

        let index: String = row.get(1);
        table
            .unique_indexes
            .entry(index)
            .or_default()
            .push(row.get(2));
    }

    tracing::debug!(
        tables = catalog.tables.len(),
        views = catalog.views.len(),
        "loaded postgresql catalog"
    );

    Ok(catalog)
}
