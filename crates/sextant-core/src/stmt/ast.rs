use super::lexer::{Lexeme, Lexer};
use super::op::{Aggregate, Builtin};
use crate::{Error, Result};

use std::fmt;

/// A parsed expression.
///
/// Parsing happens once; the tree is then compiled to SQL and type-checked
/// as many times as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    src: String,
    root: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A parenthesized list. Never empty.
    List(Vec<Node>),

    Token(Token),
}

/// A classified token. Operators and aggregates only appear at the head of
/// a list; the same word anywhere else is a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Builtin(Builtin),
    Aggregate(Aggregate),
    Literal(Literal),
    Param(Param),

    /// Column reference, possibly a dotted relational path
    Var(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
}

/// A `{}` or `{name}` placeholder, bound to one positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: Option<String>,
}

struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl Ast {
    pub fn parse(src: &str) -> Result<Ast> {
        let mut parser = Parser {
            lexer: Lexer::new(src),
        };

        let root = parser
            .parse_node()
            .map_err(|err| err.context(format!("failed to parse `{src}`")))?;

        if let Some(lexeme) = parser.lexer.next()? {
            return Err(Error::parse(format!(
                "unexpected {} after the end of `{src}`",
                describe(&lexeme)
            )));
        }

        Ok(Ast {
            src: src.to_string(),
            root,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn as_str(&self) -> &str {
        &self.src
    }

    /// Every token, depth first
    pub fn tokens(&self) -> Vec<&Token> {
        let mut ret = vec![];
        self.root.collect_tokens(&mut ret);
        ret
    }

    /// Returns `true` if an aggregate appears anywhere in the expression.
    pub fn is_aggregate(&self) -> bool {
        self.tokens()
            .iter()
            .any(|token| matches!(token, Token::Aggregate(_)))
    }

    /// Dotted paths referenced by the expression, in order of appearance
    pub fn relations(&self) -> Vec<&str> {
        self.tokens()
            .into_iter()
            .filter_map(|token| match token {
                Token::Var(path) if path.contains('.') => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Placeholders, in the order their arguments must be supplied
    pub fn params(&self) -> Vec<&Param> {
        self.tokens()
            .into_iter()
            .filter_map(|token| match token {
                Token::Param(param) => Some(param),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.src)
    }
}

impl Node {
    fn collect_tokens<'a>(&'a self, dst: &mut Vec<&'a Token>) {
        match self {
            Node::List(items) => {
                for item in items {
                    item.collect_tokens(dst);
                }
            }
            Node::Token(token) => dst.push(token),
        }
    }
}

impl Parser<'_> {
    fn parse_node(&mut self) -> Result<Node> {
        match self.lexer.next()? {
            None => Err(Error::parse("unexpected end of expression")),
            Some(Lexeme::LParen) => self.parse_list(),
            Some(lexeme) => self.parse_atom(lexeme),
        }
    }

    fn parse_list(&mut self) -> Result<Node> {
        let head = match self.lexer.next()? {
            None => return Err(Error::parse("missing `)`")),
            Some(Lexeme::RParen) => return Err(Error::parse("empty list `()`")),
            Some(Lexeme::LParen) => self.parse_list()?,
            Some(Lexeme::Word(word)) => match classify_head(&word) {
                Some(token) => Node::Token(token),
                None => Node::Token(atom(&word)?),
            },
            Some(lexeme) => self.parse_atom(lexeme)?,
        };

        let mut items = vec![head];

        loop {
            match self.lexer.peek_nth(0)? {
                None => return Err(Error::parse("missing `)`")),
                Some(Lexeme::RParen) => {
                    self.lexer.next()?;
                    break;
                }
                Some(_) => items.push(self.parse_node()?),
            }
        }

        check_arity(&items)?;
        Ok(Node::List(items))
    }

    fn parse_atom(&mut self, lexeme: Lexeme) -> Result<Node> {
        match lexeme {
            Lexeme::Str(s) => Ok(Node::Token(Token::Literal(Literal::Str(s)))),
            Lexeme::Word(word) => Ok(Node::Token(atom(&word)?)),
            Lexeme::RParen => Err(Error::parse("unexpected `)`")),
            Lexeme::LParen => self.parse_list(),
        }
    }
}

fn classify_head(word: &str) -> Option<Token> {
    if let Some(builtin) = Builtin::from_name(word) {
        return Some(Token::Builtin(builtin));
    }
    Aggregate::from_name(word).map(Token::Aggregate)
}

fn atom(word: &str) -> Result<Token> {
    if let Some(inner) = word.strip_prefix('{') {
        let name = inner
            .strip_suffix('}')
            .ok_or_else(|| Error::parse(format!("unterminated placeholder `{word}`")))?;
        let name = (!name.is_empty()).then(|| name.to_string());
        return Ok(Token::Param(Param { name }));
    }

    if let Some(name) = word.strip_prefix('.') {
        if name.is_empty() {
            return Err(Error::parse("empty variable name after `.`"));
        }
        // `.5` is a number
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            if let Ok(v) = word.parse::<f64>() {
                return Ok(Token::Literal(Literal::Float(v)));
            }
        }
        return Ok(Token::Var(name.to_string()));
    }

    let token = match word {
        "null" => Token::Literal(Literal::Null),
        "true" => Token::Literal(Literal::Bool(true)),
        "false" => Token::Literal(Literal::Bool(false)),
        _ if word.contains('.') => match word.parse::<f64>() {
            Ok(v) => Token::Literal(Literal::Float(v)),
            Err(_) => Token::Var(word.to_string()),
        },
        _ => match word.parse::<i64>() {
            Ok(v) => Token::Literal(Literal::Int(v)),
            Err(_) => Token::Var(word.to_string()),
        },
    };
    Ok(token)
}

fn check_arity(items: &[Node]) -> Result<()> {
    let (name, arity) = match &items[0] {
        Node::Token(Token::Builtin(op)) => (op.name(), op.arity()),
        Node::Token(Token::Aggregate(op)) => (op.name(), op.arity()),
        _ => return Ok(()),
    };

    let count = items.len() - 1;
    if arity.contains(&count) {
        return Ok(());
    }

    let expected = if arity.start() == arity.end() {
        arity.start().to_string()
    } else if *arity.end() == usize::MAX {
        format!("at least {}", arity.start())
    } else {
        format!("{} to {}", arity.start(), arity.end())
    };
    Err(Error::parse(format!(
        "`{name}` expects {expected} operand(s), got {count}"
    )))
}

fn describe(lexeme: &Lexeme) -> String {
    match lexeme {
        Lexeme::LParen => "`(`".to_string(),
        Lexeme::RParen => "`)`".to_string(),
        Lexeme::Str(s) => format!("string '{s}'"),
        Lexeme::Word(w) => format!("token `{w}`"),
    }
}
