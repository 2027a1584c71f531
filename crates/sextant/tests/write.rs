mod mock;
use mock::Recorder;

use pretty_assertions::assert_eq;
use sextant::{
    stmt::{Conflict, Lenient},
    Flavor, Schema, SchemaExt, Table, Transaction, TransactionOptions, Type, Value,
};

fn schema() -> Schema {
    let mut schema = Schema::new();
    schema
        .add(Table::new("city").column("name", Type::Text).natural_key(["name"]))
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
    schema
}

const RESOLVE_CITY: &str = r#"SELECT "city"."id" FROM "city" WHERE "city"."name" = ?;"#;
const UPSERT_TEMPERATURE: &str = r#"INSERT INTO "temperature" ("city", "timestamp", "value") VALUES (?, ?, ?) ON CONFLICT ("city", "timestamp") DO UPDATE SET "value" = EXCLUDED."value" RETURNING "id";"#;

const UPSERT_PERSON: &str = r#"INSERT INTO "person" ("name", "parent") VALUES (?, ?) ON CONFLICT ("name") DO UPDATE SET "parent" = EXCLUDED."parent" RETURNING "id";"#;

fn brussels() -> Vec<Value> {
    vec![
        Value::from("Brussels"),
        Value::from("2023-11-27T17:00"),
        Value::I64(7),
    ]
}

#[test]
fn upsert_resolves_foreign_keys() {
    let schema = schema();
    let upsert = schema
        .table_ref("temperature")
        .unwrap()
        .upsert(&["city.name", "timestamp", "value"])
        .unwrap();

    let mut conn = Recorder::new(Flavor::Sqlite);
    conn.respond(vec![vec![Value::I64(1)]]);
    conn.respond(vec![vec![Value::I64(10)]]);

    let id = Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &brussels())
    })
    .unwrap();

    assert_eq!(id, Some(Value::I64(10)));
    assert_eq!(
        conn.statements(),
        ["BEGIN", RESOLVE_CITY, UPSERT_TEMPERATURE, "COMMIT"]
    );
    assert_eq!(
        conn.log[2].1,
        [Value::I64(1), Value::from("2023-11-27T17:00"), Value::I64(7)]
    );
}

#[test]
fn multi_hop_paths_resolve_through_joins() {
    let schema = schema();
    let upsert = schema
        .table_ref("person")
        .unwrap()
        .upsert(&["name", "parent.parent.name"])
        .unwrap();

    let mut conn = Recorder::new(Flavor::Sqlite);
    conn.respond(vec![vec![Value::I64(2)]]);
    conn.respond(vec![vec![Value::I64(3)]]);

    let id = Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &[Value::from("Bart"), Value::from("Abe")])
    })
    .unwrap();

    assert_eq!(id, Some(Value::I64(3)));
    assert_eq!(
        conn.statements(),
        [
            "BEGIN",
            r#"SELECT "person"."id" FROM "person" LEFT JOIN "person" AS "parent_0" ON ("parent_0"."id" = "person"."parent") WHERE "parent_0"."name" = ?;"#,
            UPSERT_PERSON,
            "COMMIT"
        ]
    );
    assert_eq!(conn.log[1].1, [Value::from("Abe")]);
    assert_eq!(conn.log[2].1, [Value::from("Bart"), Value::I64(2)]);
}

#[test]
fn one_to_many_paths_resolve_through_joins() {
    let schema = schema();
    let upsert = schema
        .table_ref("person")
        .unwrap()
        .upsert(&["name", "parent.orgs.name"])
        .unwrap();

    let mut conn = Recorder::new(Flavor::Sqlite);
    conn.respond(vec![vec![Value::I64(1)]]);
    conn.respond(vec![vec![Value::I64(2)]]);

    Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &[Value::from("Juliet"), Value::from("Alpha")])
    })
    .unwrap();

    assert_eq!(
        conn.statements(),
        [
            "BEGIN",
            r#"SELECT "person"."id" FROM "person" LEFT JOIN "org" AS "orgs_0" ON ("orgs_0"."person" = "person"."id") WHERE "orgs_0"."name" = ?;"#,
            UPSERT_PERSON,
            "COMMIT"
        ]
    );
    assert_eq!(conn.log[2].1, [Value::from("Juliet"), Value::I64(1)]);
}

#[test]
fn unresolved_foreign_key_writes_nothing() {
    let schema = schema();
    let upsert = schema
        .table_ref("temperature")
        .unwrap()
        .upsert(&["city.name", "timestamp", "value"])
        .unwrap();

    let mut conn = Recorder::new(Flavor::Sqlite);
    let err = Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &brussels())
    })
    .unwrap_err();

    assert!(err.is_unresolved_foreign_key());
    assert_eq!(conn.statements(), ["BEGIN", RESOLVE_CITY, "ROLLBACK"]);
}

#[test]
fn lenient_upsert_writes_null() {
    let schema = schema();
    let table = schema.table_ref("temperature").unwrap();

    for lenient in [Lenient::All, Lenient::Columns(vec!["city.name".to_string()])] {
        let upsert = table
            .upsert(&["city.name", "timestamp", "value"])
            .unwrap()
            .lenient(lenient);

        let mut conn = Recorder::new(Flavor::Sqlite);
        conn.respond(vec![]);
        conn.respond(vec![vec![Value::I64(3)]]);

        Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
            upsert.execute(tx, &brussels())
        })
        .unwrap();

        assert_eq!(conn.log[2].1[0], Value::Null);
    }
}

#[test]
fn null_keys_skip_the_lookup() {
    let schema = schema();
    let upsert = schema
        .table_ref("person")
        .unwrap()
        .upsert(&["name", "parent.name"])
        .unwrap();

    let mut conn = Recorder::new(Flavor::Postgresql);
    conn.respond(vec![vec![Value::I64(1)]]);

    Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &[Value::from("Adam"), Value::Null])
    })
    .unwrap();

    assert_eq!(conn.statements().len(), 3);
    assert!(conn.statements()[1].starts_with(r#"INSERT INTO "person""#));
    assert_eq!(conn.log[1].1, [Value::from("Adam"), Value::Null]);
}

#[test]
fn fk_cache_avoids_repeated_lookups() {
    let schema = schema();
    let upsert = schema
        .table_ref("temperature")
        .unwrap()
        .upsert(&["city.name", "timestamp", "value"])
        .unwrap();

    let mut conn = Recorder::new(Flavor::Sqlite);
    conn.respond(vec![vec![Value::I64(1)]]);
    conn.respond(vec![vec![Value::I64(10)]]);
    conn.respond(vec![vec![Value::I64(11)]]);

    let options = TransactionOptions::default().with_fk_cache();
    Transaction::run(&mut conn, options, |tx| {
        upsert.execute(tx, &brussels())?;

        let mut later = brussels();
        later[1] = Value::from("2023-11-27T18:00");
        upsert.execute(tx, &later)
    })
    .unwrap();

    let lookups = conn
        .statements()
        .into_iter()
        .filter(|sql| *sql == RESOLVE_CITY)
        .count();
    assert_eq!(lookups, 1);
}

#[test]
fn conflict_nothing() {
    let schema = schema();
    let upsert = schema
        .table_ref("city")
        .unwrap()
        .upsert(&["name"])
        .unwrap()
        .on_conflict(Conflict::Nothing);

    let mut conn = Recorder::new(Flavor::Postgresql);
    conn.respond(vec![]);

    let id = Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &[Value::from("Brussels")])
    })
    .unwrap();

    assert_eq!(id, None);
    assert_eq!(
        conn.statements()[1],
        r#"INSERT INTO "city" ("name") VALUES ($1) ON CONFLICT ("name") DO NOTHING RETURNING "id";"#
    );
}

#[test]
fn write_conditions_are_checked_first() {
    let schema = schema();
    let upsert = schema
        .table_ref("person")
        .unwrap()
        .upsert(&["name", "parent.name"])
        .unwrap()
        .filter(&["(!= name parent.name)"])
        .unwrap();

    let mut conn = Recorder::new(Flavor::Sqlite);
    conn.respond(vec![vec![Value::I64(1)]]);
    conn.respond(vec![vec![Value::I64(1)]]);

    let err = Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &[Value::from("Tango"), Value::from("Tango")])
    })
    .unwrap_err();

    assert!(err.is_validation());

    let statements = conn.statements();
    assert_eq!(statements.len(), 4);
    assert!(statements[2].starts_with("SELECT CASE WHEN NOT ("), "{}", statements[2]);
    assert!(statements.iter().all(|sql| !sql.starts_with("INSERT")));
}

#[test]
fn write_conditions_take_no_parameters() {
    let schema = schema();
    let upsert = schema.table_ref("city").unwrap().upsert(&["name"]).unwrap();
    assert!(upsert
        .filter(&["(!= name {})"])
        .unwrap_err()
        .is_invalid_statement());
}

#[test]
fn insert_and_update() {
    let schema = schema();
    let city = schema.table_ref("city").unwrap();
    let temperature = schema.table_ref("temperature").unwrap();

    let insert = city.insert(&["name"]).unwrap();
    let update = temperature
        .update(&["city.name", "timestamp", "value"])
        .unwrap();

    let mut conn = Recorder::new(Flavor::Sqlite);
    conn.respond(vec![vec![Value::I64(5)]]);
    conn.respond(vec![vec![Value::I64(5)]]);
    conn.respond(vec![vec![Value::I64(42)]]);

    Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        assert_eq!(
            insert.execute(tx, &[Value::from("Ghent")])?,
            Some(Value::I64(5))
        );
        assert_eq!(update.execute(tx, &brussels())?, Some(Value::I64(42)));
        Ok(())
    })
    .unwrap();

    let statements = conn.statements();
    assert_eq!(
        statements[1],
        r#"INSERT INTO "city" ("name") VALUES (?) RETURNING "id";"#
    );
    assert!(statements[3].starts_with(r#"UPDATE "temperature" SET "value" = ? WHERE "city" = ?"#));
    assert_eq!(
        conn.log[3].1,
        [Value::I64(7), Value::I64(5), Value::from("2023-11-27T17:00")]
    );
}

#[test]
fn planning_errors() {
    let schema = schema();
    let temperature = schema.table_ref("temperature").unwrap();

    assert!(temperature
        .upsert(&["timestamp.name"])
        .unwrap_err()
        .is_unknown_reference());
    assert!(temperature
        .upsert(&["city", "city.name"])
        .unwrap_err()
        .is_invalid_statement());
    assert!(temperature
        .upsert(&["nope"])
        .unwrap_err()
        .is_unknown_reference());
}

#[test]
fn update_needs_a_column_to_set() {
    let schema = schema();
    let update = schema.table_ref("city").unwrap().update(&["name"]).unwrap();

    let mut conn = Recorder::new(Flavor::Sqlite);
    let err = Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        update.execute(tx, &[Value::from("Brussels")])
    })
    .unwrap_err();

    assert!(err.is_invalid_statement());
    assert_eq!(conn.statements(), ["BEGIN", "ROLLBACK"]);
}

#[test]
fn rows_must_match_the_columns() {
    let schema = schema();
    let upsert = schema.table_ref("city").unwrap().upsert(&["name"]).unwrap();

    let mut conn = Recorder::new(Flavor::Sqlite);
    let err = Transaction::run(&mut conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &[Value::from("a"), Value::from("b")])
    })
    .unwrap_err();

    assert!(err.is_invalid_statement());
}
