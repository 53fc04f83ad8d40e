//! Configuration validation.

use super::Config;
use crate::core::identifier::validate_identifier;
use crate::error::{Result, SnapshotError};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.database_url.trim().is_empty() {
        return Err(SnapshotError::Config("DATABASE_URL is required".into()));
    }
    if let Err(e) = config.database_url.parse::<tokio_postgres::Config>() {
        return Err(SnapshotError::Config(format!(
            "DATABASE_URL is not a valid PostgreSQL connection string: {}",
            e
        )));
    }

    if config.label.is_empty() {
        return Err(SnapshotError::Config("label cannot be empty".into()));
    }
    if config.label.contains(['/', '\\']) || config.label == "." || config.label == ".." {
        return Err(SnapshotError::Config(format!(
            "label must be a plain file name prefix, got '{}'",
            config.label
        )));
    }

    validate_identifier(&config.schema)?;

    Ok(())
}
