mod alter_table;
pub use alter_table::{AddColumn, AddForeignKey};

mod column_def;
pub use column_def::{ColumnDef, Reference};

mod create_index;
pub use create_index::CreateIndex;

mod create_table;
pub use create_table::{CreateTable, PrimaryKey};

mod delete;
pub use delete::{Delete, DeleteFilter};

mod drop_table;
pub use drop_table::DropTable;

mod insert;
pub use insert::{Insert, OnConflict};

mod select;
pub use select::{Direction, Select, Source};

mod sequence;
pub use sequence::{CreateSequence, DropSequence};

mod update;
pub use update::Update;

mod view;
pub use view::{CreateView, DropView};

pub use sextant_core::stmt::{Join, Param, Sql};

/// A statement ready to be rendered for one flavor
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    AddColumn(AddColumn),
    AddForeignKey(AddForeignKey),
    CreateIndex(CreateIndex),
    CreateSequence(CreateSequence),
    CreateTable(CreateTable),
    CreateView(CreateView),
    Delete(Delete),
    DropSequence(DropSequence),
    DropTable(DropTable),
    DropView(DropView),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

impl Statement {
    /// Returns `true` for schema changes
    pub fn is_ddl(&self) -> bool {
        !matches!(
            self,
            Statement::Delete(_) | Statement::Insert(_) | Statement::Select(_) | Statement::Update(_)
        )
    }

    /// Returns `true` if executing the statement produces rows.
    pub fn returns_rows(&self) -> bool {
        match self {
            Statement::Select(_) => true,
            Statement::Insert(insert) => insert.returning.is_some(),
            Statement::Update(update) => update.returning.is_some(),
            _ => false,
        }
    }
}
