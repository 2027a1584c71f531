use super::{Formatter, Params, ToSql};

/// A quoted identifier
pub(super) struct Ident<S>(pub(super) S);

/// `"qualifier"."name"`
pub(super) struct Qualified<Q, S>(pub(super) Q, pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let quoted = f.serializer.flavor.quote_ident(self.0.as_ref());
        f.dst.push_str(&quoted);
    }
}

impl<Q: AsRef<str>, S: AsRef<str>> ToSql for Qualified<Q, S> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, Ident(self.0) "." Ident(self.1));
    }
}
