use super::{Formatter, Ident, Params, ToSql};

use crate::stmt::{ColumnDef, PrimaryKey, Reference};

use sextant_core::Flavor;

impl ToSql for &ColumnDef {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let ty = &self.ty;
        fmt!(f, Ident(&self.name) " " ty);

        if self.not_null {
            fmt!(f, " NOT NULL");
        }

        if let Some(default) = &self.default {
            fmt!(f, " DEFAULT " default);
        }

        if let Some(reference) = &self.references {
            fmt!(f, " " reference);
        }
    }
}

impl ToSql for &Reference {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "REFERENCES " Ident(&self.table) " (" Ident(&self.column) ")");
    }
}

impl ToSql for &PrimaryKey {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            PrimaryKey::Surrogate { name, sequence } => {
                let name = Ident(name);
                match (f.serializer.flavor, sequence) {
                    (Flavor::Postgresql, _) => fmt!(f, name " BIGSERIAL PRIMARY KEY"),
                    (Flavor::Sqlite, _) => fmt!(f, name " INTEGER PRIMARY KEY"),
                    (Flavor::Mssql, _) => fmt!(f, name " BIGINT IDENTITY(1,1) PRIMARY KEY"),
                    (Flavor::Duckdb, Some(sequence)) => {
                        let sequence = sequence.replace('\'', "''");
                        fmt!(f, name " BIGINT PRIMARY KEY DEFAULT nextval('" sequence.as_str() "')")
                    }
                    (Flavor::Duckdb, None) => fmt!(f, name " BIGINT PRIMARY KEY"),
                }
            }
            PrimaryKey::Custom(column) => {
                fmt!(f, column " PRIMARY KEY");
            }
        }
    }
}
