use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Reasons a compile call refuses to emit SQL.
///
/// Every variant is a contract violation at the compiler boundary: no
/// partial statement is ever returned alongside one of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// The metadata document could not be deserialized.
    #[error("metadata parse error: {message}")]
    MetadataParse {
        /// Underlying deserialization message.
        message: String,
    },

    /// The data payload was not a JSON object.
    #[error("payload parse error: {message}")]
    PayloadParse {
        /// Underlying deserialization message.
        message: String,
    },

    /// A metadata record carried an empty column name.
    #[error("column name must not be empty")]
    EmptyColumnName,

    /// A classifier column name is too short to carry the id suffix.
    #[error("classifier column '{name}' is shorter than the {suffix_len}-character id suffix")]
    ClassifierSuffix {
        /// The offending column name.
        name: String,
        /// Required suffix length.
        suffix_len: usize,
    },

    /// A projection was requested over an empty metadata sequence.
    #[error("metadata for table '{table}' names no columns")]
    EmptyMetadata {
        /// Target table of the failed compile.
        table: String,
    },

    /// No payload value matched any metadata column.
    #[error("no payload value matches the metadata of table '{table}'")]
    EmptyRow {
        /// Target table of the failed compile.
        table: String,
    },
}
