use sextant_core::{
    stmt::{Param, Row, Value},
    Error, Flavor, Result,
};
use sextant_sql::{Params, Placeholder, Serializer, Statement};

/// A statement rendered for one flavor, with its placeholders in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,

    /// One entry per bound value
    pub params: Vec<Param>,

    /// Argument index of each bound value
    slots: Vec<usize>,
}

/// Collects the parameters of a statement whose placeholders may refer back
/// to an earlier argument.
struct Slotted<'a> {
    /// Argument index of each placeholder, in rendering order
    slots: std::slice::Iter<'a, usize>,
    numbered: bool,
    arity: usize,
    params: Vec<Param>,
    bound: Vec<usize>,
}

impl Params for Slotted<'_> {
    fn push(&mut self, param: &Param) -> Placeholder {
        let slot = self.slots.next().copied().unwrap_or(self.arity);
        self.arity = self.arity.max(slot + 1);

        if self.numbered {
            if slot >= self.params.len() {
                self.params.push(param.clone());
                self.bound.push(slot);
            }
            Placeholder(slot + 1)
        } else {
            self.params.push(param.clone());
            self.bound.push(slot);
            Placeholder(self.params.len())
        }
    }
}

impl Query {
    pub(crate) fn render(stmt: impl Into<Statement>, flavor: Flavor) -> Query {
        let mut params = vec![];
        let sql = Serializer::new(flavor).serialize(&stmt.into(), &mut params);
        let slots = (0..params.len()).collect();
        Query { sql, params, slots }
    }

    /// Renders `stmt` where `slots` gives the argument index of each
    /// placeholder. An argument referenced twice is numbered once on flavors
    /// with numbered placeholders and bound twice otherwise.
    pub(crate) fn render_with_slots(
        stmt: impl Into<Statement>,
        flavor: Flavor,
        slots: &[usize],
    ) -> Query {
        let mut params = Slotted {
            slots: slots.iter(),
            numbered: flavor.capability().numbered_params,
            arity: 0,
            params: vec![],
            bound: vec![],
        };
        let sql = Serializer::new(flavor).serialize(&stmt.into(), &mut params);
        Query {
            sql,
            params: params.params,
            slots: params.bound,
        }
    }

    /// Number of arguments expected by [`Query::bind`]
    pub fn arity(&self) -> usize {
        self.slots.iter().max().map_or(0, |max| max + 1)
    }

    /// Arranges `args`, one value per argument, in placeholder order.
    pub fn bind(&self, args: &[Value]) -> Result<Row> {
        if args.len() != self.arity() {
            return Err(Error::invalid_statement(format!(
                "expected {} argument(s), got {}",
                self.arity(),
                args.len()
            )));
        }
        Ok(self.slots.iter().map(|&slot| args[slot].clone()).collect())
    }

    /// Arranges a row of column values in placeholder order. Every
    /// placeholder must be named after one of `columns`.
    pub fn bind_columns(&self, columns: &[String], row: &[Value]) -> Result<Row> {
        self.params
            .iter()
            .map(|param| {
                param
                    .name
                    .as_ref()
                    .and_then(|name| columns.iter().position(|column| column == name))
                    .map(|pos| row[pos].clone())
                    .ok_or_else(|| {
                        Error::invalid_statement(format!(
                            "placeholder `{}` is not bound to a column",
                            param.name.as_deref().unwrap_or("{}")
                        ))
                    })
            })
            .collect()
    }
}
