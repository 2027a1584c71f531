use pretty_assertions::assert_eq;
use sextant_core::{
    schema::{Schema, Table, Type},
    stmt::{Ast, Env},
    Flavor,
};

fn schema() -> Schema {
    let mut schema = Schema::new();
    schema
        .add(Table::new("spam").column("a", Type::Bool).column("b", Type::Int))
        .unwrap();
    schema
        .add(
            Table::new("person")
                .column("name", Type::Text)
                .column("parent", Type::BigInt)
                .foreign_key("parent", "person")
                .natural_key(["name"]),
        )
        .unwrap();
    schema
}

fn compile(src: &str, table: &str, flavor: Flavor) -> String {
    let schema = schema();
    let mut env = Env::new(&schema, schema.table(table).unwrap());
    Ast::parse(src)
        .unwrap()
        .to_sql(&mut env, flavor)
        .unwrap()
        .to_string()
}

fn spam(src: &str) -> String {
    compile(src, "spam", Flavor::Postgresql)
}

#[test]
fn simple_eval() {
    assert_eq!(spam("a"), r#""spam"."a""#);
    assert_eq!(spam("(= a 1)"), r#""spam"."a" = 1"#);
    assert_eq!(spam("(= a (= 1 1))"), r#""spam"."a" = (1 = 1)"#);
}

#[test]
fn and_stays_bare_or_is_wrapped() {
    assert_eq!(spam("(and true true)"), "true AND true");
    assert_eq!(spam("(or true true)"), "(true OR true)");
    assert_eq!(spam("(or (and true false) true)"), "((true AND false) OR true)");
    assert_eq!(spam("(and (= a 1) (= b 2))"), r#"("spam"."a" = 1) AND ("spam"."b" = 2)"#);
}

#[test]
fn arithmetic_is_wrapped() {
    assert_eq!(spam("(+ b 1)"), r#"("spam"."b" + 1)"#);
    assert_eq!(spam("(> (* b 2) 3)"), r#"(("spam"."b" * 2)) > 3"#);
    assert_eq!(spam("(- b)"), r#"(-"spam"."b")"#);
}

#[test]
fn literals() {
    assert_eq!(spam("(= b 1.0)"), r#""spam"."b" = 1.0"#);
    assert_eq!(spam(r#"(|| "it's" 'x')"#), "'it''s' || 'x'");
    assert_eq!(spam("(is a null)"), r#""spam"."a" IS NULL"#);
    assert_eq!(spam("(in b 1 2 3)"), r#""spam"."b" IN (1, 2, 3)"#);
}

fn spam_has_error(src: &str) -> bool {
    let schema = schema();
    let mut env = Env::new(&schema, schema.table("spam").unwrap());
    Ast::parse(src).unwrap().to_sql(&mut env, Flavor::Sqlite).is_err()
}

#[test]
fn unknown_column() {
    // `.true` names a column, and spam has none by that name
    assert!(spam_has_error("(not .true)"));

    let schema = schema();
    let mut env = Env::new(&schema, schema.table("spam").unwrap());
    let err = Ast::parse("(= c 1)")
        .unwrap()
        .to_sql(&mut env, Flavor::Sqlite)
        .unwrap_err();
    assert!(err.is_unknown_reference());
}

#[test]
fn count_star() {
    assert_eq!(spam("(count)"), "count(*)");
    assert_eq!(spam("(count a)"), r#"count("spam"."a")"#);
}

#[test]
fn dialect_aggregates() {
    let agg = |src, flavor| compile(src, "person", flavor);

    assert_eq!(
        agg("(group_concat name)", Flavor::Sqlite),
        r#"group_concat("person"."name")"#
    );
    assert_eq!(
        agg("(group_concat name)", Flavor::Postgresql),
        r#"string_agg("person"."name", ',')"#
    );
    assert_eq!(
        agg("(string_agg name ';')", Flavor::Sqlite),
        r#"group_concat("person"."name", ';')"#
    );
    assert_eq!(
        agg("(every (= name 'x'))", Flavor::Sqlite),
        r#"min(("person"."name" = 'x'))"#
    );
    assert_eq!(
        agg("(bool_or (= name 'x'))", Flavor::Postgresql),
        r#"bool_or(("person"."name" = 'x'))"#
    );
    assert_eq!(
        agg("(array_agg name)", Flavor::Sqlite),
        r#"json_group_array("person"."name")"#
    );
    assert_eq!(
        agg("(group_concat name)", Flavor::Mssql),
        "STRING_AGG([person].[name], ',')"
    );
}

#[test]
fn aggregate_without_rendering() {
    let schema = schema();
    let mut env = Env::new(&schema, schema.table("person").unwrap());
    let err = Ast::parse("(json_agg name)")
        .unwrap()
        .to_sql(&mut env, Flavor::Mssql)
        .unwrap_err();
    assert!(err.is_unknown_reference());
}

#[test]
fn placeholders_stay_in_order() {
    let schema = schema();
    let mut env = Env::new(&schema, schema.table("person").unwrap());
    let sql = Ast::parse("(and (= name {first}) (= parent.name {second}))")
        .unwrap()
        .to_sql(&mut env, Flavor::Postgresql)
        .unwrap();

    let names: Vec<_> = sql
        .params()
        .map(|param| param.name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, ["first", "second"]);

    let mut n = 0;
    let rendered = sql.render(|_| {
        n += 1;
        format!("${n}")
    });
    assert_eq!(
        rendered,
        r#"("person"."name" = $1) AND ("parent_0"."name" = $2)"#
    );
}

#[test]
fn mssql_quoting_and_booleans() {
    assert_eq!(
        compile("(= a true)", "spam", Flavor::Mssql),
        "[spam].[a] = 1"
    );
}
