//! Shared fixtures for the integration tests.

use meta2sql::{ColumnMeta, Payload, TableMetadata};
use serde_json::json;

/// Metadata of the canonical student table: one plain column, one
/// classifier column.
pub fn student_metadata() -> TableMetadata {
    TableMetadata::new(vec![
        ColumnMeta::new("firstname", false).expect("valid column"),
        ColumnMeta::new("universityid", true).expect("valid column"),
    ])
}

/// Payload matching [`student_metadata`], the classifier supplied by
/// display name.
pub fn student_payload() -> Payload {
    Payload::from_value(json!({
        "firstname": "Ann",
        "universityid": "Yerevan State University"
    }))
    .expect("object payload")
}
