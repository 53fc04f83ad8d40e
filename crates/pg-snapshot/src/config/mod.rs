//! Configuration loading and validation.

pub mod env_file;
mod types;
mod validation;

pub use types::*;

use crate::error::{Result, SnapshotError};
use std::path::{Path, PathBuf};

impl Config {
    /// Load configuration from a `KEY=VALUE` env file.
    ///
    /// Only `DATABASE_URL` is read from the file; everything else keeps its
    /// default and can be overridden with the `with_*` builders.
    pub fn from_env_file<P: AsRef<Path>>(path: P, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = path.as_ref();
        let env = env_file::load(path)?;
        let database_url = env
            .get(DATABASE_URL_KEY)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                SnapshotError::Config(format!(
                    "{} not found in {}",
                    DATABASE_URL_KEY,
                    path.display()
                ))
            })?;

        let config = Config::new(database_url.clone(), output_dir);
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}
