use std::fmt;

/// Semantic column and expression types.
///
/// Columns are declared with one of these types; the serializer maps each
/// of them to a native type per flavor, and reflection maps native types
/// back. Expression type inference produces the same type, plus
/// [`Type::Unknown`] for expressions whose type cannot be known statically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// 32-bit signed integer
    Int,

    /// 64-bit signed integer
    BigInt,

    /// Double precision floating point
    Float,

    /// Variable length text
    Text,

    Bool,

    /// Date and time without a time zone
    Timestamp,

    /// Date and time with a time zone
    TimestampTz,

    Date,

    Json,

    Uuid,

    /// Binary large object
    Blob,

    /// Array of the inner type
    Array(Box<Type>),

    /// Type of `null` literals and parameter placeholders
    Unknown,
}

impl Type {
    /// Parses a type name as written in a schema description.
    ///
    /// Names are case-insensitive; a trailing `[]` (optionally separated by
    /// whitespace) denotes an array of the preceding type.
    pub fn parse(name: &str) -> Option<Type> {
        let name = name.trim();

        if let Some(inner) = name.strip_suffix("[]") {
            return Type::parse(inner).map(|ty| Type::Array(Box::new(ty)));
        }

        let ty = match name.to_ascii_lowercase().as_str() {
            "int" | "integer" | "int4" | "smallint" => Type::Int,
            "bigint" | "int8" => Type::BigInt,
            "float" | "real" | "double" | "float8" | "numeric" | "decimal" => Type::Float,
            "varchar" | "str" | "text" | "string" => Type::Text,
            "bool" | "boolean" => Type::Bool,
            "timestamp" | "datetime" => Type::Timestamp,
            "timestamptz" => Type::TimestampTz,
            "date" => Type::Date,
            "json" | "jsonb" => Type::Json,
            "uuid" => Type::Uuid,
            "blob" | "bytea" | "bytes" => Type::Blob,
            _ => return None,
        };
        Some(ty)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::BigInt | Type::Float)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int | Type::BigInt)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Number of array dimensions, `0` for scalar types.
    pub fn dims(&self) -> usize {
        match self {
            Type::Array(inner) => 1 + inner.dims(),
            _ => 0,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::BigInt => f.write_str("bigint"),
            Type::Float => f.write_str("float"),
            Type::Text => f.write_str("varchar"),
            Type::Bool => f.write_str("bool"),
            Type::Timestamp => f.write_str("timestamp"),
            Type::TimestampTz => f.write_str("timestamptz"),
            Type::Date => f.write_str("date"),
            Type::Json => f.write_str("json"),
            Type::Uuid => f.write_str("uuid"),
            Type::Blob => f.write_str("blob"),
            Type::Array(inner) => write!(f, "{inner} []"),
            Type::Unknown => f.write_str("unknown"),
        }
    }
}
