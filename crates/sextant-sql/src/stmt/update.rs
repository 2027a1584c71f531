use super::Statement;

/// `UPDATE table SET set.. WHERE key.. = ..`, executed once per row.
/// Placeholders follow `set`, then `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub set: Vec<String>,
    pub key: Vec<String>,
    pub returning: Option<String>,
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
