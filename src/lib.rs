//! Compile metadata-driven CRUD SQL with classifier lookup resolution.
#![warn(missing_docs)]

/// SQL clause assembly: fragment accumulation and statement rendering.
pub mod assembler;
/// Naming-convention resolution for classifier columns and key lookups.
pub mod classifier;
/// The CRUD operation shapes compiled from table metadata.
pub mod compiler;
/// Compile error taxonomy.
pub mod error;
/// Validated ingestion of column metadata and data payloads.
pub mod metadata;

pub use error::{CompileError, Result};
pub use metadata::{ColumnMeta, Payload, TableMetadata};
