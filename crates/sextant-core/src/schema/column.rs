use super::Type;

/// A declared column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Name of the column
    pub name: String,

    /// Semantic type of the column
    pub ty: Type,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: Type) -> Column {
        Column {
            name: name.into(),
            ty,
        }
    }

    pub fn is_array(&self) -> bool {
        self.ty.is_array()
    }

    /// Number of array dimensions of the column
    pub fn dims(&self) -> usize {
        self.ty.dims()
    }
}
