//! Configuration type definitions.

use std::path::PathBuf;

use crate::drivers::common::tls::SslMode;

/// Env file key holding the connection string.
pub const DATABASE_URL_KEY: &str = "DATABASE_URL";

/// Schema scanned when none is given.
pub const DEFAULT_SCHEMA: &str = "public";

/// Label used in file names when the URL carries no database name.
pub const DEFAULT_LABEL: &str = "database";

/// Root configuration for one backup run.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string (URL or key/value form).
    pub database_url: String,

    /// Directory the snapshot file is written to. Created if missing.
    pub output_dir: PathBuf,

    /// Prefix of the snapshot file name (`<label>.backup.<timestamp>.json`).
    pub label: String,

    /// Schema whose tables are snapshotted (default: public).
    pub schema: String,

    /// TLS mode for the connection. Encrypted transport is always required.
    pub ssl_mode: SslMode,

    /// Also dump views, not just base tables.
    pub include_views: bool,
}

impl Config {
    /// Create a configuration with defaults for everything but URL and output directory.
    pub fn new(database_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        let database_url = database_url.into();
        let label = label_from_url(&database_url).unwrap_or_else(|| DEFAULT_LABEL.to_string());
        Self {
            database_url,
            output_dir: output_dir.into(),
            label,
            schema: DEFAULT_SCHEMA.to_string(),
            ssl_mode: SslMode::default(),
            include_views: false,
        }
    }

    /// Override the file name label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Override the schema to scan.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Override the TLS mode.
    pub fn with_ssl_mode(mut self, ssl_mode: SslMode) -> Self {
        self.ssl_mode = ssl_mode;
        self
    }

    /// Include views alongside base tables.
    pub fn with_include_views(mut self, include_views: bool) -> Self {
        self.include_views = include_views;
        self
    }
}

/// Database name from a connection string, if it has one.
fn label_from_url(url: &str) -> Option<String> {
    let pg_config: tokio_postgres::Config = url.parse().ok()?;
    pg_config
        .get_dbname()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
