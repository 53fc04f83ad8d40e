//! Error types for the snapshot library.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for configuration errors (missing env file, no DATABASE_URL, ...).
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code when the database cannot be reached or authentication fails.
pub const EXIT_CONNECTION_ERROR: u8 = 2;
/// Exit code for failed catalog introspection queries.
pub const EXIT_CATALOG_ERROR: u8 = 3;
/// Exit code for failed row extraction.
pub const EXIT_EXTRACT_ERROR: u8 = 4;
/// Exit code for snapshot serialization failures.
pub const EXIT_JSON_ERROR: u8 = 5;
/// Exit code for filesystem errors (output directory, snapshot file).
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for backup operations.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Configuration error (missing env file, missing DATABASE_URL, invalid values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection could not be established or authenticated
    #[error("Database connection failed: {0}")]
    Connection(#[source] tokio_postgres::Error),

    /// A schema-introspection query failed
    #[error("Catalog query failed while {context}")]
    CatalogQuery {
        context: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Reading or decoding the rows of a table failed
    #[error("Extraction failed for table {table}: {message}")]
    Extract { table: String, message: String },

    /// Output directory or snapshot file could not be written
    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    /// Create a CatalogQuery error describing the introspection step that failed
    pub fn catalog(context: impl Into<String>, source: tokio_postgres::Error) -> Self {
        SnapshotError::CatalogQuery {
            context: context.into(),
            source,
        }
    }

    /// Create an Extract error
    pub fn extract(table: impl Into<String>, message: impl Into<String>) -> Self {
        SnapshotError::Extract {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a Filesystem error for the given path
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapshotError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            SnapshotError::Config(_) => EXIT_CONFIG_ERROR,
            SnapshotError::Connection(_) => EXIT_CONNECTION_ERROR,
            SnapshotError::CatalogQuery { .. } => EXIT_CATALOG_ERROR,
            SnapshotError::Extract { .. } => EXIT_EXTRACT_ERROR,
            SnapshotError::Json(_) => EXIT_JSON_ERROR,
            SnapshotError::Filesystem { .. } => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for backup operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;
