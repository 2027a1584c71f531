use indexmap::{IndexMap, IndexSet};

/// Tables, views and constraints found in a live database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub tables: IndexMap<String, CatalogTable>,
    pub views: IndexSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTable {
    pub name: String,

    pub columns: IndexMap<String, CatalogColumn>,

    pub primary_key: Option<String>,

    /// Column -> referenced table
    pub foreign_keys: IndexMap<String, String>,

    /// Index name -> indexed columns, for unique indexes only. Indexes
    /// backing the primary key are not listed.
    pub unique_indexes: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogColumn {
    pub name: String,

    /// Type as reported by the database, e.g. `int8` or `VARCHAR(20)`
    pub native_type: String,

    pub not_null: bool,

    pub default: Option<String>,
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog::default()
    }

    pub fn add_table(&mut self, table: CatalogTable) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn table(&self, name: &str) -> Option<&CatalogTable> {
        self.tables.get(name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn has_view(&self, name: &str) -> bool {
        self.views.contains(name)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|table| table.columns.contains_key(column))
    }

    /// Returns `true` if any table carries a unique index with this name.
    pub fn has_index(&self, name: &str) -> bool {
        self.tables
            .values()
            .any(|table| table.unique_indexes.contains_key(name))
    }
}

impl CatalogTable {
    pub fn new(name: impl Into<String>) -> CatalogTable {
        CatalogTable {
            name: name.into(),
            ..CatalogTable::default()
        }
    }

    pub fn column(mut self, name: impl Into<String>, native_type: impl Into<String>) -> CatalogTable {
        let name = name.into();
        self.columns.insert(
            name.clone(),
            CatalogColumn {
                name,
                native_type: native_type.into(),
                not_null: false,
                default: None,
            },
        );
        self
    }
}
