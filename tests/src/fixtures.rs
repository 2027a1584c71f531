use sextant::{Schema, Table, Type, View};

/// `city` and `temperature`, the latter keyed by city and timestamp
pub fn weather() -> Schema {
    let mut schema = Schema::new();
    schema
        .add(
            Table::new("city")
                .column("name", Type::Text)
                .column("country", Type::Text)
                .natural_key(["name"]),
        )
        .unwrap();
    schema
        .add(
            Table::new("temperature")
                .column("city", Type::BigInt)
                .column("timestamp", Type::Timestamp)
                .column("value", Type::Float)
                .foreign_key("city", "city")
                .natural_key(["city", "timestamp"]),
        )
        .unwrap();
    schema
        .add_view(
            View::new("freezing", "SELECT city, value FROM temperature WHERE value < 0")
                .column("city", Type::BigInt)
                .column("value", Type::Float),
        )
        .unwrap();
    schema.verify().unwrap();
    schema
}

/// Self-referencing `person` table, and the `org`s a person owns
pub fn genealogy() -> Schema {
    let mut schema = Schema::new();
    schema
        .add(
            Table::new("person")
                .column("name", Type::Text)
                .column("parent", Type::BigInt)
                .foreign_key("parent", "person")
                .natural_key(["name"])
                .one2many("orgs", "org.person"),
        )
        .unwrap();
    schema
        .add(
            Table::new("org")
                .column("name", Type::Text)
                .column("person", Type::BigInt)
                .foreign_key("person", "person")
                .natural_key(["name"]),
        )
        .unwrap();
    schema.verify().unwrap();
    schema
}
