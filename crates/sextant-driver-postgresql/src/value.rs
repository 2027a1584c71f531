use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use postgres::types::{private::BytesMut, to_sql_checked, IsNull, Kind, ToSql, Type};
use postgres::{Column, Row};
use sextant_core::{stmt::Value as CoreValue, Error, Result};

type BoxError = Box<dyn std::error::Error + Sync + Send>;

/// Borrowed argument bound to a PostgreSQL placeholder.
///
/// Placeholder types are inferred by the server when the statement is
/// prepared; the value is converted to whatever the placeholder expects.
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a CoreValue);

impl ToSql for Value<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
        match self.0 {
            CoreValue::Null => Ok(IsNull::Yes),
            CoreValue::Bool(value) => match *ty {
                Type::BOOL => value.to_sql(ty, out),
                _ => i64::from(*value).to_sql_as(ty, out),
            },
            CoreValue::I64(value) => value.to_sql_as(ty, out),
            CoreValue::F64(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                Type::FLOAT8 => value.to_sql(ty, out),
                Type::TEXT | Type::VARCHAR => value.to_string().to_sql(ty, out),
                _ => Err(mismatch(self.0, ty)),
            },
            CoreValue::String(value) => string_to_sql(value, ty, out),
            CoreValue::Bytes(value) => value.to_sql(ty, out),
            CoreValue::Json(value) => match *ty {
                Type::JSON | Type::JSONB => value.to_sql(ty, out),
                _ => value.to_string().to_sql(ty, out),
            },
            CoreValue::Uuid(value) => match *ty {
                Type::UUID => value.to_sql(ty, out),
                _ => value.to_string().to_sql(ty, out),
            },
            CoreValue::List(values) => match ty.kind() {
                Kind::Array(_) => values.iter().map(Value).collect::<Vec<_>>().to_sql(ty, out),
                _ => serde_json::to_string(&self.0.to_json())?.to_sql(ty, out),
            },
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

trait IntegerToSql {
    fn to_sql_as(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError>;
}

impl IntegerToSql for i64 {
    fn to_sql_as(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
        match *ty {
            Type::INT2 => i16::try_from(*self)?.to_sql(ty, out),
            Type::INT4 => i32::try_from(*self)?.to_sql(ty, out),
            Type::INT8 => self.to_sql(ty, out),
            Type::FLOAT4 => (*self as f32).to_sql(ty, out),
            Type::FLOAT8 => (*self as f64).to_sql(ty, out),
            Type::BOOL => (*self != 0).to_sql(ty, out),
            Type::TEXT | Type::VARCHAR => self.to_string().to_sql(ty, out),
            _ => Err(mismatch(&CoreValue::I64(*self), ty)),
        }
    }
}

fn string_to_sql(value: &str, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::TIMESTAMP => parse_timestamp(value)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => match DateTime::parse_from_rfc3339(value) {
            Ok(value) => value.with_timezone(&Utc).to_sql(ty, out),
            Err(_) => parse_timestamp(value)?.and_utc().to_sql(ty, out),
        },
        Type::DATE => NaiveDate::parse_from_str(value, "%Y-%m-%d")?.to_sql(ty, out),
        Type::UUID => uuid::Uuid::parse_str(value)?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
            .to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => value.trim().parse::<i64>()?.to_sql_as(ty, out),
        Type::FLOAT4 => value.trim().parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => value.trim().parse::<f64>()?.to_sql(ty, out),
        Type::BOOL => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => true.to_sql(ty, out),
            "false" | "f" | "0" => false.to_sql(ty, out),
            _ => Err(format!("invalid boolean literal `{value}`").into()),
        },
        _ => value.to_sql(ty, out),
    }
}

fn parse_timestamp(value: &str) -> std::result::Result<NaiveDateTime, BoxError> {
    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    Ok(date.and_time(NaiveTime::default()))
}

fn mismatch(value: &CoreValue, ty: &Type) -> BoxError {
    format!("cannot bind {value:?} to a parameter of type {ty}").into()
}

/// Reads column `index` of a result row into a core value.
pub(crate) fn from_row(row: &Row, index: usize, column: &Column) -> Result<CoreValue> {
    let ty = column.type_();

    macro_rules! get {
        ($t:ty) => {
            row.try_get::<_, Option<$t>>(index).map_err(Error::driver)?
        };
    }

    let value = match *ty {
        Type::BOOL => get!(bool).map(CoreValue::Bool),
        Type::INT2 => get!(i16).map(|v| CoreValue::I64(v.into())),
        Type::INT4 => get!(i32).map(|v| CoreValue::I64(v.into())),
        Type::INT8 => get!(i64).map(CoreValue::I64),
        Type::FLOAT4 => get!(f32).map(|v| CoreValue::F64(v.into())),
        Type::FLOAT8 => get!(f64).map(CoreValue::F64),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => get!(String).map(CoreValue::String),
        Type::TIMESTAMP => get!(NaiveDateTime).map(|v| CoreValue::String(v.to_string())),
        Type::TIMESTAMPTZ => get!(DateTime<Utc>).map(|v| CoreValue::String(v.to_rfc3339())),
        Type::DATE => get!(NaiveDate).map(|v| CoreValue::String(v.to_string())),
        Type::JSON | Type::JSONB => get!(serde_json::Value).map(CoreValue::Json),
        Type::UUID => get!(uuid::Uuid).map(CoreValue::Uuid),
        Type::BYTEA => get!(Vec<u8>).map(CoreValue::Bytes),
        Type::TEXT_ARRAY | Type::VARCHAR_ARRAY => get!(Vec<Option<String>>).map(CoreValue::from),
        Type::INT4_ARRAY => get!(Vec<Option<i32>>).map(CoreValue::from),
        Type::INT8_ARRAY => get!(Vec<Option<i64>>).map(CoreValue::from),
        Type::FLOAT8_ARRAY => get!(Vec<Option<f64>>).map(CoreValue::from),
        Type::BOOL_ARRAY => get!(Vec<Option<bool>>).map(CoreValue::from),
        _ => {
            return Err(anyhow::anyhow!(
                "unsupported PostgreSQL type `{ty}` for column `{}`",
                column.name()
            )
            .into())
        }
    };

    Ok(value.unwrap_or(CoreValue::Null))
}
