use super::{Aggregate, Ast, Builtin, Env, Literal, Node, Token};
use crate::{schema::Type, Error, Result};

impl Ast {
    /// Infers the type of the value produced by the expression.
    pub fn infer(&self, env: &Env<'_>) -> Result<Type> {
        infer_node(self.root(), env)
    }
}

fn infer_node(node: &Node, env: &Env<'_>) -> Result<Type> {
    let items = match node {
        Node::Token(token) => return infer_token(token, env),
        Node::List(items) => items,
    };

    let Some((head, tail)) = items.split_first() else {
        return Err(Error::parse("empty list `()`"));
    };

    match head {
        Node::Token(Token::Builtin(op)) => {
            let operands = infer_all(tail, env)?;
            Ok(builtin(*op, &operands))
        }
        Node::Token(Token::Aggregate(op)) => {
            let operands = infer_all(tail, env)?;
            aggregate(*op, &operands)
        }
        _ if tail.is_empty() => infer_node(head, env),
        _ => Err(Error::unknown_reference(
            "the head of a list must be an operator",
        )),
    }
}

fn infer_all(nodes: &[Node], env: &Env<'_>) -> Result<Vec<Type>> {
    nodes.iter().map(|node| infer_node(node, env)).collect()
}

fn infer_token(token: &Token, env: &Env<'_>) -> Result<Type> {
    Ok(match token {
        Token::Literal(Literal::Int(_)) => Type::Int,
        Token::Literal(Literal::Float(_)) => Type::Float,
        Token::Literal(Literal::Str(_)) => Type::Text,
        Token::Literal(Literal::Bool(_)) => Type::Bool,
        Token::Literal(Literal::Null) | Token::Param(_) => Type::Unknown,
        Token::Var(path) => env.path_type(path)?,
        Token::Builtin(_) | Token::Aggregate(_) => {
            return Err(Error::unknown_reference(
                "operators must be the head of a list",
            ))
        }
    })
}

fn builtin(op: Builtin, operands: &[Type]) -> Type {
    use Builtin::*;

    match op {
        _ if op.is_predicate() => Type::Bool,
        Add | Sub | Mul | Div => {
            if operands.contains(&Type::Float) {
                Type::Float
            } else if operands.contains(&Type::BigInt) {
                Type::BigInt
            } else {
                Type::Int
            }
        }
        Extract => Type::Float,
        _ => Type::Text,
    }
}

fn aggregate(op: Aggregate, operands: &[Type]) -> Result<Type> {
    use Aggregate::*;

    let operand = operands.first().cloned().unwrap_or(Type::Unknown);

    match op {
        Count => Ok(Type::Int),
        Sum | Avg => {
            if operand.is_numeric() || operand.is_unknown() {
                Ok(operand)
            } else {
                Err(Error::type_mismatch(op.name(), "a numeric", operand))
            }
        }
        Every | BoolAnd | BoolOr => {
            if operand == Type::Bool || operand.is_unknown() {
                Ok(Type::Bool)
            } else {
                Err(Error::type_mismatch(op.name(), "a bool", operand))
            }
        }
        Min | Max => Ok(operand),
        GroupConcat | StringAgg => Ok(Type::Text),
        ArrayAgg => Ok(Type::Array(Box::new(operand))),
        JsonAgg | JsonObjectAgg => Ok(Type::Json),
    }
}
