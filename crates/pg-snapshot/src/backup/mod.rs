//! The backup routine: connect, discover, extract, normalize, persist.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::core::schema::Table;
use crate::core::traits::CatalogReader;
use crate::drivers::postgres::PgReader;
use crate::error::Result;
use crate::snapshot::{ensure_output_dir, Snapshot, TableSnapshot};

/// Result of a backup run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSummary {
    /// Path of the written snapshot file.
    pub path: PathBuf,

    /// Number of tables in the snapshot.
    pub tables: usize,

    /// Total rows across all tables.
    pub rows: usize,

    /// When the run started (local time).
    pub started_at: DateTime<Local>,

    /// Total duration in seconds.
    pub duration_seconds: f64,
}

/// Run one backup against the database in `config`.
///
/// The connection is opened first and closed before returning, whether the
/// backup succeeded or not.
pub async fn run_backup(config: &Config) -> Result<BackupSummary> {
    config.validate()?;
    let started_at = Local::now();
    let start = Instant::now();

    let reader = PgReader::connect(&config.database_url, config.ssl_mode).await?;
    let (path, snapshot) = backup_and_close(reader, config).await?;

    let summary = BackupSummary {
        path,
        tables: snapshot.len(),
        rows: snapshot.total_rows(),
        started_at,
        duration_seconds: start.elapsed().as_secs_f64(),
    };
    info!(
        "Backup completed: {} tables, {} rows in {:.2}s",
        summary.tables, summary.rows, summary.duration_seconds
    );
    Ok(summary)
}

/// Run [`backup_with_reader`] and close `reader` afterwards, also when the
/// backup failed.
pub async fn backup_and_close<R: CatalogReader>(
    reader: R,
    config: &Config,
) -> Result<(PathBuf, Snapshot)> {
    let result = backup_with_reader(&reader, config).await;
    reader.close().await;
    result
}

/// Everything after connecting: prepare the directory, snapshot, write the file.
pub async fn backup_with_reader(
    reader: &dyn CatalogReader,
    config: &Config,
) -> Result<(PathBuf, Snapshot)> {
    ensure_output_dir(&config.output_dir)?;
    let snapshot = snapshot_database(reader, &config.schema, config.include_views).await?;
    let timestamp = Local::now().naive_local();
    let path = snapshot.write_to_dir(&config.output_dir, &config.label, timestamp)?;
    Ok((path, snapshot))
}

/// Read every table of `schema` into a snapshot, in discovery order.
pub async fn snapshot_database(
    reader: &dyn CatalogReader,
    schema: &str,
    include_views: bool,
) -> Result<Snapshot> {
    let tables = reader.list_tables(schema, include_views).await?;
    info!(
        "Discovered {} tables in {} schema '{}'",
        tables.len(),
        reader.db_type(),
        schema
    );

    let mut snapshot = Snapshot::new();
    for name in tables {
        let table = Table {
            schema: schema.to_string(),
            columns: reader.list_columns(schema, &name).await?,
            name,
        };

        let order_by = table.order_column();
        let rows = reader
            .fetch_rows(schema, &table.name, &table.columns, order_by)
            .await?;
        debug!(
            "Fetched {} rows from {} (ordered by: {:?})",
            rows.len(),
            table.full_name(),
            order_by
        );

        let data = TableSnapshot::new(table.column_names(), rows);
        info!("Backed up {} ({} rows)", table.full_name(), data.row_count());
        snapshot.insert(table.name, data);
    }

    Ok(snapshot)
}
