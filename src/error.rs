use thiserror::Error;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("record_date column is required")]
    MissingDateColumn,

    #[error("Invalid record_date in row {row}: {value}")]
    InvalidDate { row: usize, value: String },

    #[error("Invalid amount in row {row}, column '{column}': {value}")]
    InvalidAmount {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Column '{column}' appears more than once in row {row} after header normalization")]
    DuplicateColumn { row: usize, column: String },

    #[error("Invalid benchmark table: {0}")]
    InvalidBenchmarkTable(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HealthError {
    /// True for errors that reject an ingestion batch as malformed input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            HealthError::MissingDateColumn
                | HealthError::InvalidDate { .. }
                | HealthError::InvalidAmount { .. }
                | HealthError::DuplicateColumn { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, HealthError>;
