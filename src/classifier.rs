//! Naming-convention resolution for classifier columns.
//!
//! A classifier column stores a reference into a small lookup table holding
//! `(id, name)` pairs. The lookup table is never declared anywhere: its name
//! is derived from the column name by convention. Each convention lives in
//! exactly one function here so it can be swapped without touching the
//! compiler.

use crate::error::{CompileError, Result};

/// Prefix of every classifier lookup table.
pub const LOOKUP_TABLE_PREFIX: &str = "c_";

/// Length of the id suffix a classifier column name carries.
pub const ID_SUFFIX_LEN: usize = 2;

/// Display attribute every lookup table exposes.
pub const DISPLAY_COLUMN: &str = "name";

/// Derive the lookup table a classifier column resolves against.
///
/// Convention: `"c_"` plus the column name minus its trailing
/// [`ID_SUFFIX_LEN`] characters, e.g. `universityid` -> `c_university`.
///
/// Names shorter than the suffix violate the metadata contract and fail
/// fast; characters are counted, not bytes, so multibyte names cannot split
/// mid-character.
pub fn lookup_table_name(column: &str) -> Result<String> {
    let count = column.chars().count();
    if count < ID_SUFFIX_LEN {
        return Err(CompileError::ClassifierSuffix {
            name: column.to_string(),
            suffix_len: ID_SUFFIX_LEN,
        });
    }
    let stem: String = column.chars().take(count - ID_SUFFIX_LEN).collect();
    Ok(format!("{LOOKUP_TABLE_PREFIX}{stem}"))
}

/// Derive the primary-key column of a table.
///
/// Convention: the table name immediately followed by `id`.
pub fn primary_key_column(table: &str) -> String {
    format!("{table}id")
}

/// Derive the per-table lookup function used by the by-id read path.
///
/// Convention: `public.get<table>byid`.
pub fn by_id_function(table: &str) -> String {
    format!("public.get{table}byid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_table_name_strips_the_id_suffix() {
        assert_eq!(
            lookup_table_name("universityid").expect("valid classifier name"),
            "c_university"
        );
        assert_eq!(
            lookup_table_name("howdidyoufindid").expect("valid classifier name"),
            "c_howdidyoufind"
        );
    }

    #[test]
    fn lookup_table_name_counts_characters_not_bytes() {
        // Two non-ASCII trailing characters must not panic on a byte slice.
        assert_eq!(
            lookup_table_name("caféid").expect("valid classifier name"),
            "c_café"
        );
    }

    #[test]
    fn lookup_table_name_accepts_suffix_only_names() {
        // Degenerate but inside the contract: the stem is empty.
        assert_eq!(lookup_table_name("id").expect("length two is allowed"), "c_");
    }

    #[test]
    fn lookup_table_name_rejects_names_shorter_than_the_suffix() {
        let err = lookup_table_name("x").expect_err("one character must fail");
        assert_eq!(
            err,
            CompileError::ClassifierSuffix {
                name: "x".to_string(),
                suffix_len: ID_SUFFIX_LEN,
            }
        );
    }

    #[test]
    fn key_and_function_conventions_concatenate_the_table_name() {
        assert_eq!(primary_key_column("student"), "studentid");
        assert_eq!(by_id_function("student"), "public.getstudentbyid");
    }
}
