//! CLI entry point for `meta2sql`.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use serde_json::Value;

use meta2sql::compiler;
use meta2sql::{Payload, TableMetadata};

/// Operation shape to compile.
#[derive(Clone, Copy, ValueEnum)]
enum Operation {
    /// `select * from <table>`
    All,
    /// Per-table stored-function lookup by row id
    ById,
    /// One-row value derivation from a payload
    SelectRow,
    /// Full projection with classifier joins
    Project,
    /// `insert into … <select row>`
    Insert,
    /// `update … set …` with the primary-key filter
    Update,
    /// `select * from <function>(<params…>)`
    Function,
}

#[derive(Parser)]
#[command(
    name = "meta2sql",
    about = "Compile metadata-driven CRUD SQL with classifier lookup resolution"
)]
struct Cli {
    /// Operation shape to compile
    #[arg(value_enum)]
    op: Operation,

    /// Target table
    #[arg(long)]
    table: Option<String>,

    /// Column metadata JSON file (array of {column_name, isclassiferid})
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Data payload JSON file (object mapping column to value)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Row id for the by-id and update operations
    #[arg(long)]
    id: Option<String>,

    /// Stored function name for the function operation
    #[arg(long)]
    function: Option<String>,

    /// Parameter for the function operation; JSON text, repeatable
    #[arg(long = "param")]
    params: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(sql) => println!("{sql}"),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    match cli.op {
        Operation::All => {
            let table = require(&cli.table, "table")?;
            Ok(compiler::get_all_query(table))
        }
        Operation::ById => {
            let table = require(&cli.table, "table")?;
            let id = require(&cli.id, "id")?;
            Ok(compiler::get_by_id_query(table, id))
        }
        Operation::SelectRow => {
            let table = require(&cli.table, "table")?;
            let metadata = read_metadata(require(&cli.metadata, "metadata")?)?;
            let data = read_payload(require(&cli.data, "data")?)?;
            compiler::select_row_query(&metadata, table, &data).map_err(|e| e.to_string())
        }
        Operation::Project => {
            let table = require(&cli.table, "table")?;
            let metadata = read_metadata(require(&cli.metadata, "metadata")?)?;
            compiler::select_projection_query(&metadata, table).map_err(|e| e.to_string())
        }
        Operation::Insert => {
            let table = require(&cli.table, "table")?;
            let metadata = read_metadata(require(&cli.metadata, "metadata")?)?;
            let data = read_payload(require(&cli.data, "data")?)?;
            compiler::insert_query(&metadata, table, &data).map_err(|e| e.to_string())
        }
        Operation::Update => {
            let table = require(&cli.table, "table")?;
            let id = require(&cli.id, "id")?;
            let metadata = read_metadata(require(&cli.metadata, "metadata")?)?;
            let data = read_payload(require(&cli.data, "data")?)?;
            compiler::update_query(&metadata, table, id, &data).map_err(|e| e.to_string())
        }
        Operation::Function => {
            let function = require(&cli.function, "function")?;
            let params: Vec<Value> = cli.params.iter().map(|text| parse_param(text)).collect();
            Ok(compiler::function_query(function, &params))
        }
    }
}

fn require<'a, T>(value: &'a Option<T>, flag: &str) -> Result<&'a T, String> {
    value
        .as_ref()
        .ok_or_else(|| format!("--{flag} is required for this operation"))
}

fn read_metadata(path: &Path) -> Result<TableMetadata, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    TableMetadata::from_json(&json).map_err(|e| e.to_string())
}

fn read_payload(path: &Path) -> Result<Payload, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    Payload::from_json(&json).map_err(|e| e.to_string())
}

/// Parse a `--param` as JSON so numbers stay numeric; bare words fall back
/// to strings.
fn parse_param(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
