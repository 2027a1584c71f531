use super::Statement;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateView {
    pub name: String,

    /// The defining query, inserted verbatim
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropView {
    pub name: String,
}

impl From<CreateView> for Statement {
    fn from(value: CreateView) -> Self {
        Self::CreateView(value)
    }
}

impl From<DropView> for Statement {
    fn from(value: DropView) -> Self {
        Self::DropView(value)
    }
}
