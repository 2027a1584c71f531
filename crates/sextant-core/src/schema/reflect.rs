use super::{Schema, Table, Type};
use crate::{
    driver::{Catalog, CatalogTable, Flavor},
    Result,
};

impl Schema {
    /// Builds a schema describing the tables found in a live database.
    ///
    /// Column types are inferred from the native type names reported by
    /// the catalog. The first unique index of a table becomes its natural
    /// key. An integer primary key is assumed to be an auto-incrementing
    /// surrogate and is not listed among the columns.
    pub fn from_catalog(catalog: &Catalog, flavor: Flavor) -> Result<Schema> {
        let mut schema = Schema::new();
        for table in catalog.tables.values() {
            schema.add(reflect_table(table, flavor))?;
        }
        Ok(schema)
    }
}

fn reflect_table(catalog: &CatalogTable, flavor: Flavor) -> Table {
    let mut table = Table::new(&catalog.name).primary_key(catalog.primary_key.as_deref());

    for column in catalog.columns.values() {
        let ty = native_type(flavor, &column.native_type);

        if table.is_primary_key(&column.name) && ty.is_integer() {
            continue;
        }

        table = table.column(&column.name, ty);
        if let Some(default) = &column.default {
            if !table.is_primary_key(&column.name) {
                table = table.default_value(&column.name, default);
            }
        }
    }

    table.foreign_keys = catalog.foreign_keys.clone();
    table.natural_key = catalog
        .unique_indexes
        .values()
        .next()
        .cloned()
        .unwrap_or_default();

    let not_null: Vec<String> = catalog
        .columns
        .values()
        .filter(|column| column.not_null)
        .filter(|column| !table.is_primary_key(&column.name))
        .filter(|column| !table.natural_key.contains(&column.name))
        .map(|column| column.name.clone())
        .collect();
    table.not_null(not_null)
}

/// Maps a native type name to a semantic type.
pub(crate) fn native_type(flavor: Flavor, name: &str) -> Type {
    let normalized = name.trim().to_ascii_lowercase();

    if let Some(inner) = normalized.strip_suffix("[]") {
        return Type::Array(Box::new(native_type(flavor, inner)));
    }

    // PostgreSQL reports array element types with a leading underscore
    if flavor == Flavor::Postgresql {
        if let Some(inner) = normalized.strip_prefix('_') {
            return Type::Array(Box::new(native_type(flavor, inner)));
        }
    }

    // Text and JSON share NVARCHAR on SQL Server; only JSON is unbounded
    if flavor == Flavor::Mssql && normalized == "nvarchar(max)" {
        return Type::Json;
    }

    let base = match normalized.find('(') {
        Some(pos) => normalized[..pos].trim_end(),
        None => normalized.as_str(),
    };

    match base {
        "int" | "integer" | "int4" | "smallint" | "int2" | "tinyint" => Type::Int,
        "bigint" | "int8" | "bigserial" | "serial" => Type::BigInt,
        "float" | "float4" | "float8" | "real" | "double" | "double precision" | "numeric"
        | "decimal" => Type::Float,
        "varchar" | "text" | "character varying" | "character" | "char" | "nvarchar"
        | "nchar" | "string" => Type::Text,
        "bool" | "boolean" | "bit" => Type::Bool,
        "timestamp" | "timestamp without time zone" | "datetime" | "datetime2" => {
            Type::Timestamp
        }
        "timestamptz" | "timestamp with time zone" | "datetimeoffset" => Type::TimestampTz,
        "date" => Type::Date,
        "json" | "jsonb" => Type::Json,
        "uuid" | "uniqueidentifier" => Type::Uuid,
        "blob" | "bytea" | "varbinary" | "binary" => Type::Blob,
        _ => {
            tracing::warn!(%flavor, native_type = name, "unknown native type, assuming text");
            Type::Text
        }
    }
}
