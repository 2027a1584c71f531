use super::{Comma, Formatter, Ident, Params, ToSql};

use crate::stmt::{
    AddColumn, AddForeignKey, CreateIndex, CreateSequence, CreateTable, CreateView, DropSequence,
    DropTable, DropView,
};

use sextant_core::Flavor;

impl ToSql for &CreateTable {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "CREATE TABLE " Ident(&self.name) " (");

        let mut s = "";
        if let Some(pk) = &self.primary_key {
            fmt!(f, pk);
            s = ", ";
        }
        for column in &self.columns {
            fmt!(f, s column);
            s = ", ";
        }

        fmt!(f, ")");
    }
}

impl ToSql for &AddColumn {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let add = match f.serializer.flavor {
            Flavor::Mssql => " ADD ",
            _ => " ADD COLUMN ",
        };
        let column = &self.column;
        fmt!(f, "ALTER TABLE " Ident(&self.table) add column);
    }
}

impl ToSql for &AddForeignKey {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let references = &self.references;
        fmt!(
            f,
            "ALTER TABLE " Ident(&self.table)
            " ADD CONSTRAINT " Ident(self.name())
            " FOREIGN KEY (" Ident(&self.column) ") " references
        );
    }
}

impl ToSql for &CreateIndex {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let if_not_exists = match f.serializer.flavor {
            Flavor::Mssql => "",
            _ => "IF NOT EXISTS ",
        };
        let columns = Comma(self.columns.iter().map(Ident));
        fmt!(
            f,
            "CREATE UNIQUE INDEX " if_not_exists Ident(&self.name)
            " ON " Ident(&self.on) " (" columns ")"
        );
    }
}

impl ToSql for &CreateSequence {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "CREATE SEQUENCE IF NOT EXISTS " Ident(&self.name));
    }
}

impl ToSql for &DropSequence {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "DROP SEQUENCE IF EXISTS " Ident(&self.name));
    }
}

impl ToSql for &DropTable {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "DROP TABLE ");

        if self.if_exists {
            fmt!(f, "IF EXISTS ");
        }

        fmt!(f, Ident(&self.name));

        if f.serializer.flavor.capability().drop_cascade {
            fmt!(f, " CASCADE");
        }
    }
}

impl ToSql for &CreateView {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "CREATE VIEW " Ident(&self.name) " AS " self.definition.trim().trim_end_matches(';'));
    }
}

impl ToSql for &DropView {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "DROP VIEW IF EXISTS " Ident(&self.name));
    }
}
