use pretty_assertions::assert_eq;
use sextant::{
    schema::{self, create_tables, drop_tables, load_schema_from_db, plan_migration},
    Executor, Schema, Table, Transaction, TransactionOptions, Type,
};
use tests::*;

fn second_plan_is_empty(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        let plan = plan_migration(tx, &schema)?;
        assert!(plan.is_empty(), "{plan:#?}");

        // Running it again changes nothing
        create_tables(tx, &schema)?;
        assert!(plan_migration(tx, &schema)?.is_empty());
        Ok(())
    })
    .unwrap();
}

fn new_columns_are_added(setup: &dyn Setup) {
    let schema = genealogy();
    let mut conn = setup.setup(&schema);

    let mut extended = Schema::new();
    extended
        .add(
            Table::new("person")
                .column("name", Type::Text)
                .column("parent", Type::BigInt)
                .column("born", Type::Date)
                .foreign_key("parent", "person")
                .natural_key(["name"]),
        )
        .unwrap();

    Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        assert_eq!(plan_migration(tx, &extended)?.len(), 1);
        create_tables(tx, &extended)?;

        let catalog = tx.catalog()?;
        assert!(catalog.has_column("person", "born"));
        assert!(plan_migration(tx, &extended)?.is_empty());
        Ok(())
    })
    .unwrap();
}

fn catalog_reflects_the_schema(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let loaded = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        load_schema_from_db(tx)
    })
    .unwrap();

    let temperature = loaded.table("temperature").unwrap();
    assert_eq!(temperature.primary_key.as_deref(), Some("id"));
    assert_eq!(
        temperature.foreign_keys.get("city").map(String::as_str),
        Some("city")
    );
    assert_eq!(temperature.natural_key, ["city", "timestamp"]);
    assert_eq!(temperature.column_type("timestamp"), Some(Type::Timestamp));
    assert_eq!(temperature.column_type("value"), Some(Type::Float));
    assert_eq!(temperature.column_type("city"), Some(Type::BigInt));

    let city = loaded.table("city").unwrap();
    assert_eq!(city.natural_key, ["name"]);
    assert_eq!(city.default_columns(&loaded), ["name", "country"]);

    // Views are not tables
    assert!(loaded.table("freezing").is_err());
}

fn drop_removes_everything(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        drop_tables(tx, &schema)?;

        let catalog = tx.catalog()?;
        assert!(!catalog.has_table("city"));
        assert!(!catalog.has_table("temperature"));
        assert!(!catalog.has_view("freezing"));

        // Dropping what is gone is fine
        schema::drop_tables(tx, &schema)
    })
    .unwrap();
}

tests!(
    second_plan_is_empty,
    new_columns_are_added,
    catalog_reflects_the_schema,
    drop_removes_everything,
);
