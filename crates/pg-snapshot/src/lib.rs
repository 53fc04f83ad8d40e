//! # pg-snapshot
//!
//! Disaster-recovery snapshots of a small PostgreSQL database.
//!
//! One run opens a single TLS connection, lists the tables of a schema,
//! reads every column and row, and writes the lot to
//! `<label>.backup.<YYYY-MM-DD_HH-MM-SS>.json`:
//!
//! - **Catalog discovery** through `information_schema`
//! - **Deterministic order** for tables with an `id` column
//! - **Exact decimals**: `numeric` values are written as strings
//! - **Guaranteed cleanup**: the connection is closed on every exit path
//!
//! ## Example
//!
//! ```rust,no_run
//! use pg_snapshot::{run_backup, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pg_snapshot::SnapshotError> {
//!     let config = Config::from_env_file(".env", "backups")?;
//!     let summary = run_backup(&config).await?;
//!     println!("Database has been backed up to {}", summary.path.display());
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod snapshot;

// Re-exports for convenient access
pub use backup::{backup_and_close, run_backup, snapshot_database, BackupSummary};
pub use config::Config;
pub use self::core::{CatalogReader, Column, SqlValue, Table};
pub use drivers::{PgReader, SslMode};
pub use error::{Result, SnapshotError};
pub use snapshot::{Snapshot, TableSnapshot};
