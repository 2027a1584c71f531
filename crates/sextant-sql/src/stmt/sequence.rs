use super::Statement;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSequence {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropSequence {
    pub name: String,
}

impl From<CreateSequence> for Statement {
    fn from(value: CreateSequence) -> Self {
        Self::CreateSequence(value)
    }
}

impl From<DropSequence> for Statement {
    fn from(value: DropSequence) -> Self {
        Self::DropSequence(value)
    }
}
