//! Error types for data-frame construction and loading.

use std::path::PathBuf;

use crate::value::DataType;

/// Errors from building or loading a [`DataFrame`](crate::DataFrame).
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Returned when a frame would have zero columns.
    #[error("cannot build a data frame with zero columns")]
    NoColumns,

    /// Returned when the input has columns but zero data rows.
    #[error("input has no data rows")]
    EmptyInput,

    /// Returned when a column's length differs from the first column's.
    #[error("column \"{name}\" has {got} rows, expected {expected}")]
    RaggedColumns {
        /// Name of the offending column.
        name: String,
        /// Row count of the first column.
        expected: usize,
        /// Row count of the offending column.
        got: usize,
    },

    /// Returned when two columns share a name.
    #[error("duplicate column name \"{name}\"")]
    DuplicateColumn {
        /// The duplicated name.
        name: String,
    },

    /// Returned when a column mixes incompatible cell types.
    #[error("column \"{column}\" mixes {first} and {second} values")]
    MixedTypes {
        /// Name of the offending column.
        column: String,
        /// Type of the earlier cells.
        first: DataType,
        /// Type of the first conflicting cell.
        second: DataType,
    },

    /// Returned when a record's fields differ from the first record's.
    #[error("record {record_index} does not match the first record's fields (field \"{field}\")")]
    RecordShapeMismatch {
        /// Zero-based index of the offending record.
        record_index: usize,
        /// The missing or unexpected field name.
        field: String,
    },

    /// Returned when a cell value is NaN or infinite.
    #[error("non-finite value in column \"{column}\", row {row}")]
    NonFiniteValue {
        /// Name of the offending column.
        column: String,
        /// Zero-based row index.
        row: usize,
    },

    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a data row has a different column count than the header.
    #[error("row {row_index} in {path} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell cannot be parsed as the column's declared type.
    #[error("cannot parse \"{raw}\" in column \"{column}\" as {dtype}")]
    TypeParse {
        /// Name of the offending column.
        column: String,
        /// The raw cell text.
        raw: String,
        /// The declared type it failed to parse as.
        dtype: DataType,
    },

    /// Returned when an explicit type map names a column the input lacks.
    #[error("type map names unknown column \"{column}\"")]
    UnknownTypeColumn {
        /// The unknown column name.
        column: String,
    },

    /// Returned when a row index is past the end of the frame.
    #[error("row index {index} out of bounds for a frame of {height} rows")]
    RowIndexOutOfBounds {
        /// The offending row index.
        index: usize,
        /// Number of rows in the frame.
        height: usize,
    },

    /// Returned when a named column does not exist in the frame.
    #[error("no column named \"{name}\"")]
    UnknownColumn {
        /// The requested column name.
        name: String,
    },

    /// Returned when stacking frames with different schemas.
    #[error("schema mismatch: expected column \"{expected}\", got \"{got}\"")]
    SchemaMismatch {
        /// Column expected at this position.
        expected: String,
        /// Column found at this position.
        got: String,
    },
}
