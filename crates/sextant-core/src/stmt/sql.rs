use super::Param;

use std::fmt;

/// A compiled SQL fragment.
///
/// Placeholders stay symbolic until the whole statement is rendered, since
/// their numbering depends on their position in the final statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sql {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    Param(Param),
}

impl Sql {
    pub fn new() -> Sql {
        Sql::default()
    }

    pub fn text(text: impl Into<String>) -> Sql {
        let mut ret = Sql::new();
        ret.push_str(&text.into());
        ret
    }

    pub fn param(param: Param) -> Sql {
        Sql {
            parts: vec![Part::Param(param)],
        }
    }

    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.parts.last_mut() {
            Some(Part::Text(last)) => last.push_str(text),
            _ => self.parts.push(Part::Text(text.to_string())),
        }
    }

    pub fn push_param(&mut self, param: Param) {
        self.parts.push(Part::Param(param));
    }

    pub fn append(&mut self, other: Sql) {
        for part in other.parts {
            match part {
                Part::Text(text) => self.push_str(&text),
                Part::Param(param) => self.push_param(param),
            }
        }
    }

    /// Concatenates fragments with a separator.
    pub fn join(items: impl IntoIterator<Item = Sql>, sep: &str) -> Sql {
        let mut ret = Sql::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                ret.push_str(sep);
            }
            ret.append(item);
        }
        ret
    }

    /// Surrounds the fragment with parentheses.
    pub fn wrap(self) -> Sql {
        let mut ret = Sql::text("(");
        ret.append(self);
        ret.push_str(")");
        ret
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.parts.iter().filter_map(|part| match part {
            Part::Param(param) => Some(param),
            Part::Text(_) => None,
        })
    }

    pub fn has_params(&self) -> bool {
        self.params().next().is_some()
    }

    /// Renders the fragment, asking `placeholder` for the text of each
    /// parameter in order.
    pub fn render(&self, mut placeholder: impl FnMut(&Param) -> String) -> String {
        let mut ret = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => ret.push_str(text),
                Part::Param(param) => ret.push_str(&placeholder(param)),
            }
        }
        ret
    }
}

impl From<&str> for Sql {
    fn from(text: &str) -> Sql {
        Sql::text(text)
    }
}

impl From<String> for Sql {
    fn from(text: String) -> Sql {
        Sql::text(text)
    }
}

/// Displays parameters as `?`
impl fmt::Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|_| "?".to_string()))
    }
}
