//! Error types for the migration runner.

use std::path::PathBuf;

/// Errors that can occur while loading or running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A migration cannot be rolled back.
    #[error("Migration '{0}' is not reversible")]
    NotReversible(String),

    /// Database error during migration execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error reading or writing migration files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a migration file.
    #[error("Failed to parse migration file '{path}': {message}")]
    ParseError {
        /// Path to the migration file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// No migrations directory found.
    #[error("Migrations directory not found: {0}")]
    MigrationsDirNotFound(PathBuf),

    /// Migration not recorded as applied.
    #[error("Migration not found: {0}")]
    MigrationNotFound(String),

    /// Statement generation failed.
    #[error("SQL generation error: {0}")]
    Generation(#[from] pgforge_core::error::CoreError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
