use super::{Formatter, Params, ToSql};

use sextant_core::{schema::Type, Flavor};

/// Native column type for a semantic type.
pub fn native_type(ty: &Type, flavor: Flavor) -> String {
    use Flavor::*;

    let name = match (ty, flavor) {
        (Type::Int, Mssql) => "INT",
        (Type::Int, _) => "INTEGER",
        (Type::BigInt, _) => "BIGINT",
        (Type::Float, Duckdb) => "DOUBLE",
        (Type::Float, _) => "FLOAT",
        (Type::Text, Sqlite) => "TEXT",
        // Indexable length, natural keys are mostly text
        (Type::Text, Mssql) => "NVARCHAR(450)",
        (Type::Text, _) => "VARCHAR",
        (Type::Bool, Mssql) => "BIT",
        (Type::Bool, Duckdb) => "BOOLEAN",
        (Type::Bool, _) => "BOOL",
        (Type::Timestamp, Mssql) => "DATETIME2",
        (Type::Timestamp, _) => "TIMESTAMP",
        (Type::TimestampTz, Mssql) => "DATETIMEOFFSET",
        (Type::TimestampTz, _) => "TIMESTAMPTZ",
        (Type::Date, _) => "DATE",
        (Type::Json, Postgresql) => "JSONB",
        (Type::Json, Mssql) => "NVARCHAR(MAX)",
        (Type::Json, _) => "JSON",
        (Type::Uuid, Mssql) => "UNIQUEIDENTIFIER",
        (Type::Uuid, _) => "UUID",
        (Type::Blob, Postgresql) => "BYTEA",
        (Type::Blob, Mssql) => "VARBINARY(MAX)",
        (Type::Blob, _) => "BLOB",
        (Type::Array(inner), _) if flavor.capability().arrays => {
            return format!("{}[]", native_type(inner, flavor));
        }
        // Arrays are stored as JSON documents elsewhere
        (Type::Array(_), Mssql) => "NVARCHAR(MAX)",
        (Type::Array(_), _) => "JSON",
        // Only a placeholder can have an unknown type; let the database decide
        (Type::Unknown, Mssql) => "NVARCHAR(MAX)",
        (Type::Unknown, _) => "TEXT",
    };
    name.to_string()
}

impl ToSql for &Type {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let name = native_type(self, f.serializer.flavor);
        f.dst.push_str(&name);
    }
}
