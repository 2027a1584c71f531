use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use sextant_core::stmt::Value as CoreValue;

/// Borrowed argument bound to a SQLite placeholder
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a CoreValue);

impl Value<'_> {
    /// Converts a SQLite value read from a row into a core value.
    pub(crate) fn from_sql(value: ValueRef<'_>) -> CoreValue {
        match value {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) => CoreValue::String(String::from_utf8_lossy(value).into_owned()),
            ValueRef::Blob(value) => CoreValue::Bytes(value.to_vec()),
        }
    }
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            CoreValue::Null => ToSqlOutput::Owned(SqlValue::Null),
            CoreValue::Bool(true) => ToSqlOutput::Owned(SqlValue::Integer(1)),
            CoreValue::Bool(false) => ToSqlOutput::Owned(SqlValue::Integer(0)),
            CoreValue::I64(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            CoreValue::F64(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            CoreValue::String(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            CoreValue::Bytes(v) => ToSqlOutput::Borrowed(ValueRef::Blob(&v[..])),
            CoreValue::Uuid(v) => ToSqlOutput::Owned(SqlValue::Text(v.to_string())),
            // No native JSON or array type: stored as JSON text
            value @ (CoreValue::Json(_) | CoreValue::List(_)) => {
                ToSqlOutput::Owned(SqlValue::Text(value.to_json().to_string()))
            }
        })
    }
}
