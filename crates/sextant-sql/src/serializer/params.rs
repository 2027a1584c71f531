use super::{Formatter, ToSql};

use sextant_core::{stmt::Param, Flavor};

pub trait Params {
    fn push(&mut self, param: &Param) -> Placeholder;
}

/// 1-based position of a placeholder in the statement
pub struct Placeholder(pub usize);

impl Params for Vec<Param> {
    fn push(&mut self, param: &Param) -> Placeholder {
        self.push(param.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match f.serializer.flavor {
            Flavor::Postgresql => f.dst.push_str(&format!("${}", self.0)),
            Flavor::Sqlite | Flavor::Mssql | Flavor::Duckdb => f.dst.push('?'),
        }
    }
}
