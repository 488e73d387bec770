//! Validated ingestion of the external metadata and payload contracts.
//!
//! The metadata provider hands over an ordered JSON array of
//! `{ "column_name": ..., "isclassiferid": ... }` records (the misspelled
//! field name is the wire contract). Both fields are mandatory. Validation
//! happens once, in the smart constructors here, so the compiler can assume
//! well-formed input instead of re-checking fields mid-build.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::classifier::ID_SUFFIX_LEN;
use crate::error::{CompileError, Result};

/// Wire-level metadata record, exactly as the metadata service emits it.
#[derive(Debug, Clone, Deserialize)]
struct RawColumn {
    column_name: String,
    isclassiferid: bool,
}

/// One validated column descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    name: String,
    is_classifier: bool,
}

impl ColumnMeta {
    /// Validate and build a descriptor.
    ///
    /// Rejects empty names, and classifier names too short to carry the id
    /// suffix the lookup-table convention strips.
    pub fn new(name: impl Into<String>, is_classifier: bool) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CompileError::EmptyColumnName);
        }
        if is_classifier && name.chars().count() < ID_SUFFIX_LEN {
            return Err(CompileError::ClassifierSuffix {
                name,
                suffix_len: ID_SUFFIX_LEN,
            });
        }
        Ok(Self {
            name,
            is_classifier,
        })
    }

    /// Column name, in the case the metadata service supplied.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the column references a lookup table by display name.
    pub fn is_classifier(&self) -> bool {
        self.is_classifier
    }
}

/// Ordered column descriptors for one table.
///
/// Order is the canonical order columns appear in generated SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    columns: Vec<ColumnMeta>,
}

impl TableMetadata {
    /// Wrap already-validated descriptors.
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self { columns }
    }

    /// Ingest the metadata service's JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawColumn> =
            serde_json::from_str(json).map_err(|e| CompileError::MetadataParse {
                message: e.to_string(),
            })?;
        Self::from_raw(raw)
    }

    /// Ingest an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let raw: Vec<RawColumn> =
            serde_json::from_value(value.clone()).map_err(|e| CompileError::MetadataParse {
                message: e.to_string(),
            })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: Vec<RawColumn>) -> Result<Self> {
        let columns = raw
            .into_iter()
            .map(|record| ColumnMeta::new(record.column_name, record.isclassiferid))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(columns))
    }

    /// The descriptors, in canonical order.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// True when no columns are described.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Copy of this metadata minus one column, order preserved.
    ///
    /// Callers strip the primary-key column this way before compiling
    /// inserts and updates, since the key is never client-supplied.
    pub fn without_column(&self, name: &str) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .filter(|column| column.name() != name)
                .cloned()
                .collect(),
        }
    }
}

/// Column-name-to-value mapping supplied alongside inserts and updates.
///
/// Keys are a subset of the metadata column names; a metadata column with no
/// payload entry is silently skipped by every compile shape.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    values: Map<String, Value>,
}

impl Payload {
    /// Parse a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| CompileError::PayloadParse {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Wrap an already-parsed JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(CompileError::PayloadParse {
                message: format!("expected a JSON object, got {other}"),
            }),
        }
    }

    /// Value supplied for a column, if any.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// True when a value was supplied for the column.
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// True when no values were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_meta_rejects_empty_names() {
        let err = ColumnMeta::new("", false).expect_err("empty name must fail");
        assert_eq!(err, CompileError::EmptyColumnName);
    }

    #[test]
    fn column_meta_rejects_short_classifier_names() {
        let err = ColumnMeta::new("x", true).expect_err("short classifier must fail");
        assert!(matches!(err, CompileError::ClassifierSuffix { .. }));

        // The same name is fine when it is not a classifier.
        ColumnMeta::new("x", false).expect("plain single-character column is valid");
    }

    #[test]
    fn without_column_drops_only_the_named_column() {
        let metadata = TableMetadata::new(vec![
            ColumnMeta::new("studentid", false).expect("valid"),
            ColumnMeta::new("firstname", false).expect("valid"),
            ColumnMeta::new("universityid", true).expect("valid"),
        ]);

        let filtered = metadata.without_column("studentid");
        let names: Vec<&str> = filtered.columns().iter().map(ColumnMeta::name).collect();
        assert_eq!(names, vec!["firstname", "universityid"]);
    }

    #[test]
    fn payload_rejects_non_objects() {
        let err = Payload::from_json("[1, 2]").expect_err("arrays are not payloads");
        assert!(matches!(err, CompileError::PayloadParse { .. }));
    }
}
