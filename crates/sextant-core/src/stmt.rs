//! The expression language: parsing, SQL compilation and type inference.
//!
//! Expressions are written in prefix form, e.g. `(and (= name {}) (> age 18))`.
//! Dotted variables such as `parent.name` traverse foreign keys; the joins
//! they require are planned by [`Env`].

mod ast;
pub use ast::{Ast, Literal, Node, Param, Token};

mod compile;

mod env;
pub use env::{Env, Join};

mod infer;

mod lexer;

mod op;
pub use op::{Aggregate, Builtin};

mod sql;
pub use sql::{Part, Sql};

mod value;
pub use value::{Row, Value};
