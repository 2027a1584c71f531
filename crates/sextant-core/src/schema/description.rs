use super::{Schema, Table, Type, View};
use crate::{Error, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Declarative schema, as loaded from a configuration file.
///
/// Tables are keyed by name. Views are listed under the reserved `views`
/// key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescription {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub views: IndexMap<String, ViewDescription>,

    #[serde(flatten)]
    pub tables: IndexMap<String, TableDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDescription {
    /// Column name -> type name
    #[serde(default)]
    pub columns: IndexMap<String, String>,

    #[serde(default)]
    pub foreign_keys: IndexMap<String, String>,

    #[serde(default)]
    pub natural_key: Vec<String>,

    #[serde(default)]
    pub not_null: Vec<String>,

    #[serde(default)]
    pub default: IndexMap<String, String>,

    /// `None` when the table has no primary key. Absent means `id`.
    #[serde(
        default = "default_primary_key",
        deserialize_with = "deserialize_primary_key"
    )]
    pub primary_key: Option<String>,

    #[serde(default)]
    pub one2many: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewDescription {
    #[serde(default)]
    pub columns: IndexMap<String, String>,

    pub definition: String,
}

fn default_primary_key() -> Option<String> {
    Some(super::DEFAULT_PRIMARY_KEY.to_string())
}

fn deserialize_primary_key<'de, D>(deserializer: D) -> core::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|name| !name.eq_ignore_ascii_case("none")))
}

fn parse_type(table: &str, column: &str, name: &str) -> Result<Type> {
    Type::parse(name).ok_or_else(|| {
        Error::incorrect_table_definition(
            table,
            format!("unknown type `{name}` for column `{column}`"),
        )
    })
}

impl TableDescription {
    pub fn to_table(&self, name: &str) -> Result<Table> {
        let mut table = Table::new(name).primary_key(self.primary_key.as_deref());
        for (column, ty) in &self.columns {
            table = table.column(column, parse_type(name, column, ty)?);
        }
        table.foreign_keys = self.foreign_keys.clone();
        table.natural_key = self.natural_key.clone();
        table.not_null = self.not_null.iter().cloned().collect();
        table.default = self.default.clone();
        table.one2many = self.one2many.clone();
        Ok(table)
    }
}

impl SchemaDescription {
    pub fn from_json(src: &str) -> Result<SchemaDescription> {
        Ok(serde_json::from_str(src)?)
    }
}

impl Schema {
    /// Builds and verifies a schema from its description.
    pub fn from_description(description: &SchemaDescription) -> Result<Schema> {
        let mut schema = Schema::new();
        for (name, table) in &description.tables {
            schema.add(table.to_table(name)?)?;
        }
        for (name, view) in &description.views {
            let mut ret = View::new(name, &view.definition);
            for (column, ty) in &view.columns {
                ret = ret.column(column, parse_type(name, column, ty)?);
            }
            schema.add_view(ret)?;
        }
        schema.verify()?;
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_forms() {
        let src = r#"{
            "a": {"columns": {"name": "varchar"}},
            "b": {"columns": {"name": "varchar"}, "primary_key": null},
            "c": {"columns": {"name": "varchar"}, "primary_key": "none"},
            "d": {"columns": {"code": "varchar"}, "primary_key": "code"}
        }"#;
        let description = SchemaDescription::from_json(src).unwrap();
        let pk = |name: &str| description.tables[name].primary_key.clone();

        assert_eq!(pk("a").as_deref(), Some("id"));
        assert_eq!(pk("b"), None);
        assert_eq!(pk("c"), None);
        assert_eq!(pk("d").as_deref(), Some("code"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let src = r#"{"a": {"colums": {"name": "varchar"}}}"#;
        assert!(SchemaDescription::from_json(src).is_err());
    }

    #[test]
    fn unknown_type() {
        let src = r#"{"a": {"columns": {"name": "varchr"}}}"#;
        let description = SchemaDescription::from_json(src).unwrap();
        let err = Schema::from_description(&description).unwrap_err();
        assert!(err.is_incorrect_table_definition());
    }
}
