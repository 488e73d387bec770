//! Metadata-driven compilation of the CRUD operation shapes.
//!
//! Every operation walks the column metadata exactly once, delegating
//! fragment emission to [`crate::assembler`] and naming conventions to
//! [`crate::classifier`]. Compilation never performs I/O and never validates
//! names against a real schema; the returned string is the whole result.

use serde_json::Value;

use crate::assembler::{Keyword, QueryBuilder};
use crate::classifier::{
    by_id_function, lookup_table_name, primary_key_column, DISPLAY_COLUMN,
};
use crate::error::{CompileError, Result};
use crate::metadata::{Payload, TableMetadata};

/// Lookup tables referenced by the classifier columns of one compile call.
///
/// Ordered by first occurrence and keyed by table name, so a lookup table
/// referenced by several columns joins exactly once.
struct LookupTables {
    entries: Vec<(String, Value)>,
}

impl LookupTables {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn record(&mut self, table: String, value: Value) {
        if !self.entries.iter().any(|(name, _)| *name == table) {
            self.entries.push((table, value));
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(table, value)| (table.as_str(), value))
    }
}

/// Compile `select * from <table>`.
pub fn get_all_query(table: &str) -> String {
    let mut builder = QueryBuilder::new(Keyword::Select);
    builder.select_all_columns();
    builder.add_from_table(table);
    builder.build()
}

/// Compile the by-id read.
///
/// This is a fixed, non-generic exception path: it invokes the per-table
/// stored function `public.get<table>byid(<id>)` directly instead of going
/// through the metadata walk. The id is interpolated as-is.
pub fn get_by_id_query(table: &str, id: &str) -> String {
    format!("select * from {}({id})", by_id_function(table))
}

/// Compile `select * from <function>(<params…>)`.
///
/// Stored-procedure-backed reads, e.g. the metadata provider's own
/// `getcolumnbytablenamewithclassiferbool('student')`.
pub fn function_query(function: &str, params: &[Value]) -> String {
    let mut builder = QueryBuilder::new(Keyword::Select);
    builder.select_all_columns();
    builder.add_from_function(function, params);
    builder.build()
}

/// Compile the one-row value derivation used as an INSERT row source.
///
/// Non-classifier columns project their payload value as a literal;
/// classifier columns project the lookup table's key column and constrain
/// the lookup row by the supplied display name. Metadata columns absent
/// from the payload are skipped.
pub fn select_row_query(
    metadata: &TableMetadata,
    table: &str,
    data: &Payload,
) -> Result<String> {
    let mut builder = QueryBuilder::new(Keyword::Select);
    let mut lookups = LookupTables::new();
    let mut first = true;

    for column in metadata.columns() {
        let Some(value) = data.get(column.name()) else {
            continue;
        };
        if !first {
            builder.append_comma();
        }
        first = false;

        if column.is_classifier() {
            let lookup = lookup_table_name(column.name())?;
            builder.add_column(&lookup, column.name());
            lookups.record(lookup, value.clone());
        } else {
            builder.append_value(value);
        }
    }

    if first {
        return Err(CompileError::EmptyRow {
            table: table.to_string(),
        });
    }

    for (lookup, _) in lookups.iter() {
        builder.add_from_table(lookup);
    }
    for (lookup, value) in lookups.iter() {
        builder.add_filter_where(lookup, DISPLAY_COLUMN, value);
    }

    Ok(builder.build())
}

/// Compile the full projection with classifier joins.
///
/// Projects every metadata column: plain columns from the main table,
/// classifier columns from their lookup table, joined on the classifier key
/// so each id travels with its resolved row.
pub fn select_projection_query(metadata: &TableMetadata, table: &str) -> Result<String> {
    if metadata.is_empty() {
        return Err(CompileError::EmptyMetadata {
            table: table.to_string(),
        });
    }

    let mut builder = QueryBuilder::new(Keyword::Select);
    // (lookup table, key column), first occurrence wins.
    let mut joins: Vec<(String, String)> = Vec::new();
    let mut first = true;

    builder.add_from_table(table);

    for column in metadata.columns() {
        if !first {
            builder.append_comma();
        }
        first = false;

        if column.is_classifier() {
            let lookup = lookup_table_name(column.name())?;
            builder.add_column(&lookup, column.name());
            if !joins.iter().any(|(name, _)| *name == lookup) {
                joins.push((lookup, column.name().to_string()));
            }
        } else {
            builder.add_column(table, column.name());
        }
    }

    for (lookup, _) in &joins {
        builder.add_from_table(lookup);
    }
    for (lookup, key_column) in &joins {
        builder.add_filter_where_table(table, key_column, lookup, key_column);
    }

    Ok(builder.build())
}

/// Compile `insert into <table> (<columns…>) <row source>`.
///
/// Two phases: the column list names every metadata column present in the
/// payload, in metadata order; the row itself is produced by a nested
/// select ([`select_row_query`]) so classifier columns resolve by join
/// instead of duplicating resolution logic here.
pub fn insert_query(metadata: &TableMetadata, table: &str, data: &Payload) -> Result<String> {
    let mut builder = QueryBuilder::new(Keyword::InsertInto);
    builder.add_table(table);
    builder.open_brace();

    let mut first = true;
    for column in metadata.columns() {
        if !data.contains(column.name()) {
            continue;
        }
        if !first {
            builder.append_comma();
        }
        first = false;
        builder.append(column.name());
    }
    builder.close_brace();

    if first {
        return Err(CompileError::EmptyRow {
            table: table.to_string(),
        });
    }

    builder.set_row_source(select_row_query(metadata, table, data)?);
    Ok(builder.build())
}

/// Compile `update <table> set …` with the conventional primary-key filter.
///
/// Plain columns assign their literal; classifier columns assign the key
/// derived from the lookup table via a scalar subquery on the display name.
/// The WHERE clause always terminates with `<table>."<table>id" = <id>`,
/// the id interpolated as-is.
pub fn update_query(
    metadata: &TableMetadata,
    table: &str,
    id: &str,
    data: &Payload,
) -> Result<String> {
    let mut builder = QueryBuilder::new(Keyword::Update);
    builder.add_table(table);

    let mut assigned = false;
    for column in metadata.columns() {
        let Some(value) = data.get(column.name()) else {
            continue;
        };
        assigned = true;

        if column.is_classifier() {
            let lookup = lookup_table_name(column.name())?;
            builder.add_filter_set_column(
                column.name(),
                &lookup,
                column.name(),
                DISPLAY_COLUMN,
                value,
            );
        } else {
            builder.add_filter_set(column.name(), value);
        }
    }

    if !assigned {
        return Err(CompileError::EmptyRow {
            table: table.to_string(),
        });
    }

    builder.add_filter_where_raw(table, &primary_key_column(table), id);
    Ok(builder.build())
}
