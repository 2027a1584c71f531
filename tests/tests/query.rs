use pretty_assertions::assert_eq;
use sextant::{
    stmt::Direction, Error, Executor, Scope, SchemaExt, Transaction, TransactionOptions, Value,
};
use tests::*;

fn seed(tx: &mut dyn Executor) -> sextant::Result<()> {
    let schema = weather();
    let city = schema.table_ref("city")?.upsert(&["name", "country"])?;
    city.execute_many(
        tx,
        &[
            vec![Value::from("Brussels"), Value::from("BE")],
            vec![Value::from("Bruges"), Value::from("BE")],
            vec![Value::from("Ghent"), Value::from("BE")],
            vec![Value::from("Lille"), Value::from("FR")],
        ],
    )?;

    let temperature = schema.table_ref("temperature")?.upsert(&[])?;
    temperature.execute_many(
        tx,
        &[
            vec![Value::from("Brussels"), Value::from("2023-11-27T17:00"), Value::F64(7.0)],
            vec![Value::from("Brussels"), Value::from("2023-11-27T18:00"), Value::F64(5.0)],
            vec![Value::from("Ghent"), Value::from("2023-11-27T17:00"), Value::F64(-1.0)],
            vec![Value::from("Lille"), Value::from("2023-11-27T17:00"), Value::F64(9.0)],
        ],
    )?;
    Ok(())
}

fn aggregates_group_by_city(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        seed(tx)?;
        schema
            .table_ref("temperature")?
            .select(&["city.name", "(avg value)", "(count)"])?
            .filter(&["(= city.country {})"])?
            .order_by("city.name", Direction::Asc)?
            .execute(tx, &[Value::from("BE")])
    })
    .unwrap();

    assert_eq!(
        rows,
        [
            vec![Value::from("Brussels"), Value::F64(6.0), Value::I64(2)],
            vec![Value::from("Ghent"), Value::F64(-1.0), Value::I64(1)],
        ]
    );
}

fn grouping_on_parameterized_columns(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        seed(tx)?;
        schema
            .table_ref("temperature")?
            .select(&["(+ value {})", "(count)"])?
            .filter(&["(= city.name 'Brussels')", "(> value {})"])?
            .execute(tx, &[Value::F64(1.0), Value::F64(6.0)])
    })
    .unwrap();

    assert_eq!(rows, [vec![Value::F64(8.0), Value::I64(1)]]);
}

fn two_hop_paths(setup: &dyn Setup) {
    let schema = genealogy();
    let mut conn = setup.setup(&schema);

    let person = schema.table_ref("person").unwrap();

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        let upsert = person.upsert(&["name", "parent.name"])?;
        upsert.execute(tx, &[Value::from("Abe"), Value::Null])?;
        upsert.execute(tx, &[Value::from("Homer"), Value::from("Abe")])?;
        upsert.execute(tx, &[Value::from("Bart"), Value::from("Homer")])?;

        person
            .select(&["name", "parent.name", "parent.parent.name"])?
            .filter(&["(not (is parent.parent.name null))"])?
            .execute(tx, &[])
    })
    .unwrap();

    assert_eq!(
        rows,
        [vec![Value::from("Bart"), Value::from("Homer"), Value::from("Abe")]]
    );
}

fn suggest_distinct_values(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        seed(tx)?;

        let city = schema.table_ref("city")?;
        assert_eq!(
            city.suggest(tx, "name", Some("Bru%"))?,
            [Value::from("Bruges"), Value::from("Brussels")]
        );

        let temperature = schema.table_ref("temperature")?;
        assert_eq!(
            temperature.suggest(tx, "city.name", None)?,
            [Value::from("Brussels"), Value::from("Ghent"), Value::from("Lille")]
        );
        Ok(())
    })
    .unwrap();
}

fn delete_and_update(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let temperature = schema.table_ref("temperature").unwrap();

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        seed(tx)?;

        temperature
            .delete()
            .filter(&["(= city.country 'FR')"])?
            .execute(tx, &[])?;

        let update = temperature.update(&["city.name", "timestamp", "value"])?;
        let id = update.execute(
            tx,
            &[Value::from("Ghent"), Value::from("2023-11-27T17:00"), Value::F64(0.5)],
        )?;
        assert!(id.is_some());

        // No row for that hour: nothing to update
        let missing = update.execute(
            tx,
            &[Value::from("Ghent"), Value::from("2023-11-27T23:00"), Value::F64(0.5)],
        )?;
        assert_eq!(missing, None);

        temperature
            .select(&["city.name", "value"])?
            .order_by("value", Direction::Asc)?
            .execute(tx, &[])
    })
    .unwrap();

    assert_eq!(
        rows,
        [
            vec![Value::from("Ghent"), Value::F64(0.5)],
            vec![Value::from("Brussels"), Value::F64(5.0)],
            vec![Value::from("Brussels"), Value::F64(7.0)],
        ]
    );
}

fn rollback_option_discards_writes(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let options = TransactionOptions::default().with_rollback();
    Transaction::run(&mut *conn, options, |tx| seed(tx)).unwrap();

    let rows = Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        schema.table_ref("city")?.select(&["name"])?.execute(tx, &[])
    })
    .unwrap();
    assert!(rows.is_empty());
}

fn statements_need_a_scope(setup: &dyn Setup) {
    let schema = weather();
    let mut conn = setup.setup(&schema);

    let select = schema
        .table_ref("city")
        .unwrap()
        .select(&["name"])
        .unwrap()
        .order_by("name", Direction::Desc)
        .unwrap()
        .limit(1);

    let mut scope = Scope::new();
    let err: Error = select.execute(&mut scope, &[]).unwrap_err();
    assert!(err.is_no_active_transaction());

    let tx = Transaction::new(&mut *conn, TransactionOptions::default()).unwrap();
    let rows = scope
        .run(tx, |scope| {
            seed(scope)?;
            select.execute(scope, &[])
        })
        .unwrap();

    assert_eq!(rows, [vec![Value::from("Lille")]]);
}

tests!(
    aggregates_group_by_city,
    grouping_on_parameterized_columns,
    two_hop_paths,
    suggest_distinct_values,
    delete_and_update,
    rollback_option_discards_writes,
    statements_need_a_scope,
);
