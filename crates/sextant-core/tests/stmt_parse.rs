use sextant_core::stmt::{Aggregate, Ast, Builtin, Literal, Node, Param, Token};

fn tokens(src: &str) -> Vec<Token> {
    Ast::parse(src)
        .unwrap()
        .tokens()
        .into_iter()
        .cloned()
        .collect()
}

fn var(name: &str) -> Token {
    Token::Var(name.to_string())
}

#[test]
fn bare_dotted_reference() {
    let ast = Ast::parse("ham.spam").unwrap();
    assert_eq!(ast.root(), &Node::Token(var("ham.spam")));
}

#[test]
fn literals_and_placeholders() {
    assert_eq!(
        tokens("(= ham.spam 1)"),
        [
            Token::Builtin(Builtin::Eq),
            var("ham.spam"),
            Token::Literal(Literal::Int(1))
        ]
    );
    assert_eq!(
        tokens("(= ham.spam 'one')"),
        [
            Token::Builtin(Builtin::Eq),
            var("ham.spam"),
            Token::Literal(Literal::Str("one".into()))
        ]
    );
    assert_eq!(
        tokens("(= ham.spam {})"),
        [
            Token::Builtin(Builtin::Eq),
            var("ham.spam"),
            Token::Param(Param { name: None })
        ]
    );
    assert_eq!(
        tokens("(< x {limit} 1.5)")[2..],
        [
            Token::Param(Param {
                name: Some("limit".into())
            }),
            Token::Literal(Literal::Float(1.5))
        ]
    );
}

#[test]
fn string_operator() {
    assert_eq!(
        tokens(r#"(|| 'one' "two")"#),
        [
            Token::Builtin(Builtin::Concat),
            Token::Literal(Literal::Str("one".into())),
            Token::Literal(Literal::Str("two".into()))
        ]
    );
}

#[test]
fn classification_depends_on_position() {
    // An aggregate name in argument position is a variable
    assert_eq!(
        tokens("(max min)"),
        [Token::Aggregate(Aggregate::Max), var("min")]
    );
    assert_eq!(tokens("(count)"), [Token::Aggregate(Aggregate::Count)]);

    // An operator sign in argument position is a variable too
    assert_eq!(
        tokens("(1 + 1)"),
        [
            Token::Literal(Literal::Int(1)),
            var("+"),
            Token::Literal(Literal::Int(1))
        ]
    );
}

#[test]
fn keyword_literals_and_escape() {
    assert_eq!(
        tokens("(is null true)"),
        [
            Token::Builtin(Builtin::Is),
            Token::Literal(Literal::Null),
            Token::Literal(Literal::Bool(true))
        ]
    );
    assert_eq!(
        tokens("(is null .true)"),
        [
            Token::Builtin(Builtin::Is),
            Token::Literal(Literal::Null),
            var("true")
        ]
    );
}

#[test]
fn leading_dot_numbers() {
    assert_eq!(
        tokens("(+ .5 .x5)"),
        [
            Token::Builtin(Builtin::Add),
            Token::Literal(Literal::Float(0.5)),
            var("x5")
        ]
    );
    assert_eq!(tokens(".5e1"), [Token::Literal(Literal::Float(5.0))]);
    assert_eq!(tokens(".5th"), [var("5th")]);
}

#[test]
fn relations_and_params() {
    let ast = Ast::parse("(and (= ham.spam foo.bar) (= x {a}) (> y {}))").unwrap();
    assert_eq!(ast.relations(), ["ham.spam", "foo.bar"]);
    assert_eq!(ast.params().len(), 2);
    assert!(!ast.is_aggregate());

    let ast = Ast::parse("(sum (* price qty))").unwrap();
    assert!(ast.is_aggregate());
}

#[test]
fn malformed_expressions() {
    for src in ["", "(= a 1", "(= a 1))", "()", "(not)", "(= a 1 2)", "(json_object_agg a)", "'open"] {
        let err = Ast::parse(src).unwrap_err();
        assert!(err.is_parse(), "`{src}` gave {err}");
    }
}
