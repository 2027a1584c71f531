mod table;

use anyhow::Result;
use clap::Parser;
use sextant::{
    schema::load_schema_from_db, stmt::Direction, Connection, Schema, SchemaDescription, SchemaExt,
    Transaction, TransactionOptions,
};
use tracing_subscriber::EnvFilter;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

#[derive(Parser, Debug)]
#[command(name = "sextant")]
#[command(about = "Query and edit relational tables with s-expressions")]
#[command(version)]
struct Cli {
    /// Data source URL, e.g. `sqlite://weather.db`
    #[arg(long, env = "SEXTANT_DB")]
    db: String,

    /// JSON schema description. The schema is read from the database when
    /// omitted.
    #[arg(long, env = "SEXTANT_SCHEMA")]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Print rows of a table
    Select {
        table: String,

        /// Columns or expressions to select, all columns by default
        columns: Vec<String>,

        /// Filter conditions, joined with `and`
        #[arg(long = "where", short)]
        filter: Vec<String>,

        #[arg(long, short)]
        limit: Option<u64>,

        /// Sort expression, prefixed with `-` for descending order
        #[arg(long, allow_hyphen_values = true)]
        orderby: Option<String>,
    },

    /// Delete rows of a table
    Delete {
        table: String,

        /// Filter conditions, joined with `and`. Every row is deleted when
        /// none is given.
        #[arg(long = "where", short)]
        filter: Vec<String>,
    },

    /// List the tables of the schema
    Schema,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut conn = sextant::connect(&cli.db)?;
    tracing::debug!(flavor = %conn.flavor(), "connected");

    Transaction::run(&mut *conn, TransactionOptions::default(), |tx| {
        let schema = match &cli.schema {
            Some(path) => read_schema(path)?,
            None => load_schema_from_db(tx)?,
        };

        match &cli.command {
            Command::Select {
                table,
                columns,
                filter,
                limit,
                orderby,
            } => {
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                let filter: Vec<&str> = filter.iter().map(String::as_str).collect();

                let mut select = schema.table_ref(table)?.select(&columns)?.filter(&filter)?;

                if let Some(expr) = orderby {
                    select = match expr.strip_prefix('-') {
                        Some(expr) => select.order_by(expr, Direction::Desc)?,
                        None => select.order_by(expr, Direction::Asc)?,
                    };
                }

                if let Some(limit) = limit {
                    select = select.limit(*limit);
                }

                let header = select.dtypes()?;
                let rows = select.execute(tx, &[])?;
                print!("{}", table::render(&header, &rows));
            }
            Command::Delete { table, filter } => {
                let filter: Vec<&str> = filter.iter().map(String::as_str).collect();
                schema.table_ref(table)?.delete().filter(&filter)?.execute(tx, &[])?;
            }
            Command::Schema => {
                for table in schema.tables() {
                    let columns: Vec<String> = table
                        .columns
                        .values()
                        .map(|column| format!("{} {}", column.name, column.ty))
                        .collect();
                    println!("{}({})", table.name, columns.join(", "));
                }
                for view in schema.views() {
                    println!("{} (view)", view.name());
                }
            }
        }

        Ok(())
    })?;

    Ok(())
}

fn read_schema(path: &Path) -> sextant::Result<Schema> {
    let file = std::fs::File::open(path)?;
    let description: SchemaDescription = serde_json::from_reader(std::io::BufReader::new(file))?;
    Schema::from_description(&description)
}
