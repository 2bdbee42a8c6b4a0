use thiserror::Error;

/// Result type for pgarchive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Error types for pgarchive operations
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No columns found for table '{schema}.{table}'")]
    SchemaLookup { schema: String, table: String },

    #[error("Failed to archive '{table}': {message}")]
    Execution { table: String, message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },
}
