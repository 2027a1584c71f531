/// Per-flavor feature switches consulted by the statement renderer and the
/// migration planner.
#[derive(Debug)]
pub struct Capability {
    /// Supports `INSERT .. ON CONFLICT`. When false, upserts are rendered as
    /// `MERGE` statements.
    pub on_conflict: bool,

    /// Inserted rows are reported with `RETURNING`. When false, the
    /// `OUTPUT inserted.*` clause is used instead.
    pub returning: bool,

    /// A foreign key may reference a table that does not exist yet, so the
    /// migration planner never has to defer a constraint.
    pub forward_references: bool,

    /// Supports `ALTER TABLE .. ADD CONSTRAINT .. FOREIGN KEY`.
    pub add_constraint: bool,

    /// `DROP TABLE` accepts `CASCADE`.
    pub drop_cascade: bool,

    /// Surrogate keys are drawn from a sequence instead of an
    /// auto-incrementing column type.
    pub key_sequence: bool,

    /// Native array column types.
    pub arrays: bool,

    /// Paging with `LIMIT`/`OFFSET`. When false, `TOP` and
    /// `OFFSET .. FETCH` are used.
    pub limit_offset: bool,

    /// Placeholders carry the number of their argument (`$1`), so a
    /// statement can reference one argument twice. When false, placeholders
    /// are anonymous and a repeated argument is bound again.
    pub numbered_params: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        on_conflict: true,
        returning: true,
        forward_references: true,
        add_constraint: false,
        drop_cascade: false,
        key_sequence: false,
        arrays: false,
        limit_offset: true,
        numbered_params: false,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        forward_references: false,
        add_constraint: true,
        drop_cascade: true,
        arrays: true,
        numbered_params: true,
        ..Self::SQLITE
    };

    /// DuckDB capabilities
    pub const DUCKDB: Self = Self {
        forward_references: false,
        key_sequence: true,
        arrays: true,
        ..Self::SQLITE
    };

    /// Microsoft SQL Server capabilities
    pub const MSSQL: Self = Self {
        on_conflict: false,
        returning: false,
        forward_references: false,
        add_constraint: true,
        drop_cascade: false,
        key_sequence: false,
        arrays: false,
        limit_offset: false,
        numbered_params: false,
    };
}
