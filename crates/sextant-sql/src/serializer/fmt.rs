use super::{Formatter, Params};

macro_rules! fmt {
    ($f:expr, $( $fragments:expr )*) => {{
        $(
            $fragments.to_sql($f);
        )*
    }};
}

pub(super) trait ToSql {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>);
}

impl ToSql for &str {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        f.dst.push_str(self);
    }
}

impl ToSql for &String {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        f.dst.push_str(self);
    }
}

impl ToSql for u64 {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        f.dst.push_str(&self.to_string());
    }
}

impl<S: ToSql> ToSql for Option<S> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        if let Some(inner) = self {
            inner.to_sql(f);
        }
    }
}

/// Expression fragments: text is copied, placeholders are numbered in
/// the order they are written.
impl ToSql for &sextant_core::stmt::Sql {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        use sextant_core::stmt::Part;

        for part in self.parts() {
            match part {
                Part::Text(text) => f.dst.push_str(text),
                Part::Param(param) => {
                    let placeholder = f.params.push(param);
                    placeholder.to_sql(f);
                }
            }
        }
    }
}
