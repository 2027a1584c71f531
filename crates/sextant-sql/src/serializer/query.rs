use super::{ident::Qualified, Comma, Formatter, Ident, Params, ToSql};

use sextant_core::Flavor;

use crate::stmt::{
    Delete, DeleteFilter, Direction, Insert, Join, OnConflict, Param, Select, Source, Sql, Update,
};

/// Placeholder bound to the value of a named column
struct ColumnParam<'a>(&'a str);

/// `AND`-ed conditions
struct Conditions<'a>(&'a [Sql]);

impl ToSql for ColumnParam<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let param = Param {
            name: Some(self.0.to_string()),
        };
        let placeholder = f.params.push(&param);
        placeholder.to_sql(f);
    }
}

impl ToSql for Conditions<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        if self.0.is_empty() {
            return;
        }
        fmt!(f, " WHERE " super::delim::Delimited(self.0, " AND "));
    }
}

impl ToSql for &Join {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(
            f,
            " LEFT JOIN " Ident(&self.table) " AS " Ident(&self.alias)
            " ON (" Qualified(&self.alias, &self.column)
            " = " Qualified(&self.parent, &self.parent_column) ")"
        );
    }
}

impl ToSql for &Source {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Source::Table(name) => fmt!(f, Ident(name)),
            Source::Row { columns, alias } => {
                // SQLite derives affinity from type names; casting a text
                // timestamp would turn it into a number.
                let cast = f.serializer.flavor != Flavor::Sqlite;

                fmt!(f, "(SELECT ");
                let mut s = "";
                for (name, ty) in columns {
                    if cast {
                        fmt!(f, s "CAST(" ColumnParam(name) " AS " ty ") AS " Ident(name));
                    } else {
                        fmt!(f, s ColumnParam(name) " AS " Ident(name));
                    }
                    s = ", ";
                }
                fmt!(f, ") AS " Ident(alias));
            }
        }
    }
}

impl ToSql for &Select {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let paging = !f.serializer.flavor.capability().limit_offset;

        fmt!(f, "SELECT ");

        if self.distinct {
            fmt!(f, "DISTINCT ");
        }

        // No LIMIT clause
        if paging && self.offset.is_none() {
            if let Some(limit) = self.limit {
                fmt!(f, "TOP " limit " ");
            }
        }

        if self.columns.is_empty() {
            fmt!(f, "*");
        } else {
            fmt!(f, Comma(&self.columns));
        }

        let source = &self.source;
        fmt!(f, " FROM " source);

        for join in &self.joins {
            fmt!(f, join);
        }

        fmt!(f, Conditions(&self.filter));

        if !self.group_by.is_empty() {
            fmt!(f, " GROUP BY " Comma(&self.group_by));
        }

        if !self.order_by.is_empty() {
            let order = self.order_by.iter().map(|(expr, direction)| (expr, *direction));
            fmt!(f, " ORDER BY " Comma(order));
        } else if paging && self.offset.is_some() {
            fmt!(f, " ORDER BY (SELECT NULL)");
        }

        if paging {
            if let Some(offset) = self.offset {
                fmt!(f, " OFFSET " offset " ROWS");
                if let Some(limit) = self.limit {
                    fmt!(f, " FETCH NEXT " limit " ROWS ONLY");
                }
            }
            return;
        }

        if let Some(limit) = self.limit {
            fmt!(f, " LIMIT " limit);
        }

        if let Some(offset) = self.offset {
            fmt!(f, " OFFSET " offset);
        }
    }
}

impl ToSql for (&Sql, Direction) {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let direction = match self.1 {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, self.0 direction);
    }
}

impl ToSql for &Insert {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        if let (Some(on_conflict), false) = (
            &self.on_conflict,
            f.serializer.flavor.capability().on_conflict,
        ) {
            return merge(self, on_conflict, f);
        }

        let table = Ident(&self.table);
        let returning = self.returning.as_deref();

        fmt!(f, "INSERT INTO " table);

        if self.columns.is_empty() {
            fmt!(f, " DEFAULT VALUES");
        } else {
            let columns = Comma(self.columns.iter().map(Ident));
            fmt!(f, " (" columns ")");
        }

        if !f.serializer.flavor.capability().returning {
            if let Some(returning) = returning {
                fmt!(f, " OUTPUT inserted." Ident(returning));
            }
        }

        if !self.columns.is_empty() {
            let values = Comma(self.columns.iter().map(|column| ColumnParam(column)));
            fmt!(f, " VALUES (" values ")");
        }

        if let Some(on_conflict) = &self.on_conflict {
            let key = Comma(on_conflict.key.iter().map(Ident));
            fmt!(f, " ON CONFLICT (" key ")");

            if on_conflict.update.is_empty() {
                fmt!(f, " DO NOTHING");
            } else {
                let set = Comma(on_conflict.update.iter().map(|column| Excluded(column)));
                fmt!(f, " DO UPDATE SET " set);
            }
        }

        if f.serializer.flavor.capability().returning {
            if let Some(returning) = returning {
                fmt!(f, " RETURNING " Ident(returning));
            }
        }
    }
}

/// `"column" = EXCLUDED."column"`
struct Excluded<'a>(&'a str);

impl ToSql for Excluded<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, Ident(self.0) " = EXCLUDED." Ident(self.0));
    }
}

/// Upsert for flavors without `ON CONFLICT`
fn merge<T: Params>(insert: &Insert, on_conflict: &OnConflict, f: &mut Formatter<'_, T>) {
    let source = insert
        .columns
        .iter()
        .map(|column| SourceColumn(column));
    let on = super::delim::Delimited(
        on_conflict.key.iter().map(|column| MergeKey(column)),
        " AND ",
    );

    fmt!(
        f,
        "MERGE INTO " Ident(&insert.table) " WITH (HOLDLOCK) AS " Ident("target")
        " USING (SELECT " Comma(source) ") AS " Ident("source")
        " ON (" on ")"
    );

    if !on_conflict.update.is_empty() {
        let set = Comma(on_conflict.update.iter().map(|column| MergeSet(column)));
        fmt!(f, " WHEN MATCHED THEN UPDATE SET " set);
    }

    let columns = Comma(insert.columns.iter().map(Ident));
    let values = Comma(
        insert
            .columns
            .iter()
            .map(|column| Qualified("source", column)),
    );
    fmt!(f, " WHEN NOT MATCHED THEN INSERT (" columns ") VALUES (" values ")");

    if let Some(returning) = &insert.returning {
        fmt!(f, " OUTPUT inserted." Ident(returning));
    }
}

/// `? AS "column"`
struct SourceColumn<'a>(&'a str);

/// `target.column = source.column`
struct MergeKey<'a>(&'a str);

/// `column = source.column`
struct MergeSet<'a>(&'a str);

impl ToSql for SourceColumn<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, ColumnParam(self.0) " AS " Ident(self.0));
    }
}

impl ToSql for MergeKey<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, Qualified("target", self.0) " = " Qualified("source", self.0));
    }
}

impl ToSql for MergeSet<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, Ident(self.0) " = " Qualified("source", self.0));
    }
}

impl ToSql for &Update {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let set = Comma(self.set.iter().map(|column| Assign(column)));
        let key = super::delim::Delimited(self.key.iter().map(|column| Assign(column)), " AND ");

        fmt!(f, "UPDATE " Ident(&self.table) " SET " set);

        let native_returning = f.serializer.flavor.capability().returning;

        if let (Some(returning), false) = (&self.returning, native_returning) {
            fmt!(f, " OUTPUT inserted." Ident(returning));
        }

        fmt!(f, " WHERE " key);

        if let (Some(returning), true) = (&self.returning, native_returning) {
            fmt!(f, " RETURNING " Ident(returning));
        }
    }
}

/// `"column" = ?`
struct Assign<'a>(&'a str);

impl ToSql for Assign<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, Ident(self.0) " = " ColumnParam(self.0));
    }
}

impl ToSql for &Delete {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "DELETE FROM " Ident(&self.table));

        match &self.filter {
            DeleteFilter::Where(conditions) => fmt!(f, Conditions(conditions)),
            DeleteFilter::KeyIn { key, query } => {
                let query: &Select = query;
                fmt!(
                    f,
                    " WHERE " Qualified(&self.table, key) " IN (" query ")"
                );
            }
        }
    }
}
