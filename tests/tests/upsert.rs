use pretty_assertions::assert_eq;
use sextant::{
    stmt::{Conflict, Lenient},
    Connection, Executor, SchemaExt, Transaction, TransactionOptions, Value,
};
use tests::*;

fn brussels() -> Vec<Value> {
    vec![
        Value::from("Brussels"),
        Value::from("2023-11-27T17:00"),
        Value::I64(7),
    ]
}

fn count(conn: &mut dyn Connection, table: &str) -> Value {
    let rows = conn
        .execute(&format!("SELECT count(*) FROM \"{table}\""), &[])
        .unwrap();
    rows[0][0].clone()
}

fn unresolved_city_fails(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let upsert = schema
        .table_ref("temperature")
        .unwrap()
        .upsert(&["city.name", "timestamp", "value"])
        .unwrap();

    let err = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &brussels())
    })
    .unwrap_err();

    assert!(err.is_unresolved_foreign_key());
    assert_eq!(count(&mut *conn, "temperature"), Value::I64(0));
}

fn lenient_upsert_writes_null(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let temperature = schema.table_ref("temperature").unwrap();
    let upsert = temperature
        .upsert(&["city.name", "timestamp", "value"])
        .unwrap()
        .lenient(Lenient::Columns(vec!["city.name".to_string()]));

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        let id = upsert.execute(tx, &brussels())?;
        assert!(id.is_some());

        temperature.select(&["city", "value"])?.execute(tx, &[])
    })
    .unwrap();

    assert_eq!(rows, [vec![Value::Null, Value::F64(7.0)]]);
}

fn resolved_upsert_reads_back(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let city = schema.table_ref("city").unwrap();
    let temperature = schema.table_ref("temperature").unwrap();

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        city.upsert(&["name", "country"])?
            .execute(tx, &[Value::from("Brussels"), Value::from("BE")])?;

        let upsert = temperature.upsert(&[])?;
        upsert.execute(tx, &brussels())?;

        // Same key, new value
        let mut warmer = brussels();
        warmer[2] = Value::F64(9.5);
        upsert.execute(tx, &warmer)?;

        temperature.select(&["city.name", "value"])?.execute(tx, &[])
    })
    .unwrap();

    assert_eq!(rows, [vec![Value::from("Brussels"), Value::F64(9.5)]]);
}

fn conflict_nothing_reports_new_rows_only(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let city = schema.table_ref("city").unwrap();

    Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        let nothing = city.upsert(&["name"])?.on_conflict(Conflict::Nothing);
        let first = nothing.execute(tx, &[Value::from("Ghent")])?;
        let second = nothing.execute(tx, &[Value::from("Ghent")])?;
        assert!(first.is_some());
        assert_eq!(second, None);

        let update = city.upsert(&["name"])?;
        assert_eq!(update.execute(tx, &[Value::from("Ghent")])?, first);
        Ok(())
    })
    .unwrap();
}

fn write_conditions_reject_rows(setup: &dyn Setup) {
    let schema = genealogy();
    let mut conn = setup.setup(&schema);

    let person = schema.table_ref("person").unwrap();

    Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        person.upsert(&["name"])?.execute(tx, &[Value::from("Tango")])?;
        Ok(())
    })
    .unwrap();

    let upsert = person
        .upsert(&["name", "parent.name"])
        .unwrap()
        .filter(&["(!= name parent.name)"])
        .unwrap();

    let err = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &[Value::from("Tango"), Value::from("Tango")])
    })
    .unwrap_err();
    assert!(err.is_validation());

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        upsert.execute(tx, &[Value::from("Bob"), Value::from("Tango")])?;
        person
            .select(&["name", "parent.name"])?
            .filter(&["(= name 'Bob')"])?
            .execute(tx, &[])
    })
    .unwrap();

    assert_eq!(rows, [vec![Value::from("Bob"), Value::from("Tango")]]);
}

fn multi_hop_foreign_keys(setup: &dyn Setup) {
    let schema = genealogy();
    let mut conn = setup.setup(&schema);

    let person = schema.table_ref("person").unwrap();

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        let upsert = person.upsert(&["name", "parent.name"])?;
        upsert.execute(tx, &[Value::from("G"), Value::Null])?;
        upsert.execute(tx, &[Value::from("P"), Value::from("G")])?;

        // The parent of C is the person whose parent is G
        person
            .upsert(&["name", "parent.parent.name"])?
            .execute(tx, &[Value::from("C"), Value::from("G")])?;

        person
            .select(&["name", "parent.name", "parent.parent.name"])?
            .filter(&["(= name 'C')"])?
            .execute(tx, &[])
    })
    .unwrap();

    assert_eq!(
        rows,
        [vec![Value::from("C"), Value::from("P"), Value::from("G")]]
    );
}

fn one_to_many_foreign_keys(setup: &dyn Setup) {
    let schema = genealogy();
    let mut conn = setup.setup(&schema);

    let person = schema.table_ref("person").unwrap();
    let org = schema.table_ref("org").unwrap();

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        person
            .upsert(&["name"])?
            .execute_many(tx, &[vec![Value::from("Charly")], vec![Value::from("Juliet")]])?;
        org.upsert(&["name", "person.name"])?.execute_many(
            tx,
            &[
                vec![Value::from("Alpha"), Value::from("Charly")],
                vec![Value::from("Bravo"), Value::from("Juliet")],
            ],
        )?;

        // The parent of Juliet is the owner of Alpha
        person
            .upsert(&["name", "parent.orgs.name"])?
            .execute(tx, &[Value::from("Juliet"), Value::from("Alpha")])?;

        person
            .select(&["name", "parent.name"])?
            .filter(&["(= name 'Juliet')"])?
            .execute(tx, &[])
    })
    .unwrap();

    assert_eq!(rows, [vec![Value::from("Juliet"), Value::from("Charly")]]);
}

fn batch_fails_as_a_whole(setup: &dyn Setup) {
    let schema = genealogy();
    let mut conn = setup.setup(&schema);

    let upsert = schema
        .table_ref("person")
        .unwrap()
        .upsert(&["name", "parent.name"])
        .unwrap();

    let err = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        upsert.execute_many(
            tx,
            &[
                vec![Value::from("Adam"), Value::Null],
                vec![Value::from("Cain"), Value::from("Eve")],
            ],
        )
    })
    .unwrap_err();

    assert!(err.is_unresolved_foreign_key());
    assert_eq!(count(&mut *conn, "person"), Value::I64(0));
}

fn fk_cache_remembers_resolved_keys(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let city = schema.table_ref("city").unwrap();
    let upsert = schema
        .table_ref("temperature")
        .unwrap()
        .upsert(&["city.name", "timestamp", "value"])
        .unwrap();

    let options = TransactionOptions::default().with_fk_cache();
    Transaction::run(&mut *conn, options, |tx| {
        let id = city.upsert(&["name"])?.execute(tx, &[Value::from("Brussels")])?;

        let rows: Vec<_> = (0..5)
            .map(|hour| {
                vec![
                    Value::from("Brussels"),
                    Value::from(format!("2023-11-27T1{hour}:00")),
                    Value::I64(hour),
                ]
            })
            .collect();
        upsert.execute_many(tx, &rows)?;

        let cache = tx.fk_cache()?.expect("cache enabled");
        let resolver = cache.resolver(&("city".to_string(), vec!["name".to_string()]));
        assert_eq!(resolver.get(&vec![Value::from("Brussels")]), id);
        Ok(())
    })
    .unwrap();
}

tests!(
    unresolved_city_fails,
    lenient_upsert_writes_null,
    resolved_upsert_reads_back,
    conflict_nothing_reports_new_rows_only,
    write_conditions_reject_rows,
    multi_hop_foreign_keys,
    one_to_many_foreign_keys,
    batch_fails_as_a_whole,
    fk_cache_remembers_resolved_keys,
);
