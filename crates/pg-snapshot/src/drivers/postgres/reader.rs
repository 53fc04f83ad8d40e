//! PostgreSQL catalog reader.
//!
//! Holds exactly one connection for the whole backup run. Catalog lookups
//! bind schema and table names as parameters; the row query quotes every
//! identifier it splices in.

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::config::SslMode as PgSslMode;
use tokio_postgres::{Client, Config as PgConfig, Row};
use tracing::{debug, info, warn};

use crate::core::identifier::{qualify_pg, quote_pg};
use crate::core::schema::{Column, ColumnKind};
use crate::core::traits::CatalogReader;
use crate::core::value::SqlValue;
use crate::drivers::common::tls::{SslMode, TlsBuilder};
use crate::error::{Result, SnapshotError};

/// PostgreSQL reader over a single TLS connection.
pub struct PgReader {
    client: Client,
    connection: JoinHandle<()>,
    database: String,
}

impl PgReader {
    /// Connect to the database at `database_url` over TLS.
    ///
    /// The URL's own `sslmode` is overridden: the connection always requires
    /// TLS, verified according to `ssl_mode`.
    pub async fn connect(database_url: &str, ssl_mode: SslMode) -> Result<Self> {
        let mut pg_config: PgConfig = database_url.parse().map_err(|e| {
            SnapshotError::Config(format!("invalid DATABASE_URL: {}", e))
        })?;
        pg_config.ssl_mode(PgSslMode::Require);

        let database = pg_config.get_dbname().unwrap_or("<default>").to_string();
        let tls = TlsBuilder::new(ssl_mode).build()?;

        let (client, connection) = pg_config
            .connect(tls)
            .await
            .map_err(SnapshotError::Connection)?;

        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("PostgreSQL connection error: {}", e);
            }
        });

        // Test connection; timestamptz values are rendered in UTC.
        client
            .simple_query("SET TIME ZONE 'UTC'")
            .await
            .map_err(SnapshotError::Connection)?;

        info!("Connected to PostgreSQL database '{}' (ssl_mode={})", database, ssl_mode);

        Ok(Self {
            client,
            connection,
            database,
        })
    }
}

#[async_trait]
impl CatalogReader for PgReader {
    async fn list_tables(&self, schema: &str, include_views: bool) -> Result<Vec<String>> {
        let query = r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = $1
              AND (table_type = 'BASE TABLE' OR ($2 AND table_type = 'VIEW'))
            ORDER BY table_name
        "#;

        let rows = self
            .client
            .query(query, &[&schema, &include_views])
            .await
            .map_err(|e| SnapshotError::catalog(format!("listing tables of schema '{}'", schema), e))?;

        let tables: Vec<String> = rows.iter().map(|row| row.get(0)).collect();
        debug!("Found {} tables in schema '{}'", tables.len(), schema);
        Ok(tables)
    }

    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<Column>> {
        let query = r#"
            SELECT column_name::text, udt_name::text, ordinal_position::int4
            FROM information_schema.columns
            WHERE table_schema = $1 AND table_name = $2
            ORDER BY ordinal_position
        "#;

        let rows = self
            .client
            .query(query, &[&schema, &table])
            .await
            .map_err(|e| {
                SnapshotError::catalog(format!("listing columns of {}.{}", schema, table), e)
            })?;

        let columns: Vec<Column> = rows
            .iter()
            .map(|row| Column {
                name: row.get(0),
                data_type: row.get(1),
                ordinal_pos: row.get(2),
            })
            .collect();

        debug!("Loaded {} columns for {}.{}", columns.len(), schema, table);
        Ok(columns)
    }

    async fn fetch_rows(
        &self,
        schema: &str,
        table: &str,
        columns: &[Column],
        order_by: Option<&str>,
    ) -> Result<Vec<Vec<SqlValue>>> {
        let sql = build_select_query(schema, table, columns, order_by)?;
        debug!("Row query: {}", sql);

        let full_name = format!("{}.{}", schema, table);
        let rows = self
            .client
            .query(sql.as_str(), &[])
            .await
            .map_err(|e| SnapshotError::extract(&full_name, format!("query failed: {}", e)))?;

        let kinds: Vec<ColumnKind> = columns.iter().map(Column::kind).collect();
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut converted = Vec::with_capacity(kinds.len());
            for (idx, kind) in kinds.iter().enumerate() {
                let value = convert_pg_value(row, idx, *kind).map_err(|e| {
                    SnapshotError::extract(
                        &full_name,
                        format!(
                            "decoding column '{}' ({}): {}",
                            columns[idx].name, columns[idx].data_type, e
                        ),
                    )
                })?;
                converted.push(value);
            }
            values.push(converted);
        }

        Ok(values)
    }

    fn db_type(&self) -> &str {
        "postgres"
    }

    /// Drop the client and wait for the connection task to finish.
    async fn close(self) {
        drop(self.client);
        if let Err(e) = self.connection.await {
            warn!("PostgreSQL connection task failed: {}", e);
        }
        info!("Closed connection to PostgreSQL database '{}'", self.database);
    }
}

/// Build the row extraction query for a table.
///
/// Columns without a native decoder are fetched as text (see
/// [`ColumnKind::select_expr`]); `order_by` adds an ascending sort on that column.
fn build_select_query(
    schema: &str,
    table: &str,
    columns: &[Column],
    order_by: Option<&str>,
) -> Result<String> {
    let select_list = columns
        .iter()
        .map(|col| Ok(col.kind().select_expr(&quote_pg(&col.name)?)))
        .collect::<Result<Vec<_>>>()?
        .join(", ");

    let mut sql = format!("SELECT {} FROM {}", select_list, qualify_pg(schema, table)?);
    if let Some(col) = order_by {
        sql.push_str(&format!(" ORDER BY {} ASC", quote_pg(col)?));
    }
    Ok(sql)
}

/// Decode one column of a result row.
fn convert_pg_value(
    row: &Row,
    idx: usize,
    kind: ColumnKind,
) -> std::result::Result<SqlValue, tokio_postgres::Error> {
    let value = match kind {
        ColumnKind::Bool => row
            .try_get::<_, Option<bool>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Bool),
        ColumnKind::Int16 => row
            .try_get::<_, Option<i16>>(idx)?
            .map_or(SqlValue::Null, SqlValue::I16),
        ColumnKind::Int32 => row
            .try_get::<_, Option<i32>>(idx)?
            .map_or(SqlValue::Null, SqlValue::I32),
        ColumnKind::Int64 => row
            .try_get::<_, Option<i64>>(idx)?
            .map_or(SqlValue::Null, SqlValue::I64),
        ColumnKind::Float32 => row
            .try_get::<_, Option<f32>>(idx)?
            .map_or(SqlValue::Null, SqlValue::F32),
        ColumnKind::Float64 => row
            .try_get::<_, Option<f64>>(idx)?
            .map_or(SqlValue::Null, SqlValue::F64),
        ColumnKind::Numeric => row
            .try_get::<_, Option<String>>(idx)?
            .map_or(SqlValue::Null, SqlValue::from_numeric_text),
        ColumnKind::Text
        | ColumnKind::Other
        | ColumnKind::Timestamp
        | ColumnKind::TimestampTz
        | ColumnKind::Date => row
            .try_get::<_, Option<String>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Text),
        ColumnKind::Uuid => row
            .try_get::<_, Option<uuid::Uuid>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Uuid),
        ColumnKind::Json => row
            .try_get::<_, Option<serde_json::Value>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Json),
        ColumnKind::Time => row
            .try_get::<_, Option<chrono::NaiveTime>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Time),
        ColumnKind::Bytea => row
            .try_get::<_, Option<Vec<u8>>>(idx)?
            .map_or(SqlValue::Null, SqlValue::Bytes),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(defs: &[(&str, &str)]) -> Vec<Column> {
        defs.iter()
            .enumerate()
            .map(|(i, (name, ty))| Column::new(*name, *ty, i as i32 + 1))
            .collect()
    }

    #[test]
    fn test_select_query_orders_by_id() {
        let columns = cols(&[("id", "int4"), ("title", "varchar")]);
        let sql = build_select_query("public", "books", &columns, Some("id")).unwrap();
        assert_eq!(
            sql,
            r#"SELECT "id", "title" FROM "public"."books" ORDER BY "id" ASC"#
        );
    }

    #[test]
    fn test_select_query_without_order() {
        let columns = cols(&[("name", "text")]);
        let sql = build_select_query("public", "departments", &columns, None).unwrap();
        assert_eq!(sql, r#"SELECT "name" FROM "public"."departments""#);
    }

    #[test]
    fn test_select_query_casts_numeric_and_unknown_types() {
        let columns = cols(&[("price", "numeric"), ("tags", "_text"), ("sold", "bool")]);
        let sql = build_select_query("public", "books", &columns, None).unwrap();
        assert_eq!(
            sql,
            r#"SELECT "price"::text, "tags"::text, "sold" FROM "public"."books""#
        );
    }

    #[test]
    fn test_select_query_renders_dates_and_timestamps_as_text() {
        let columns = cols(&[("id", "int4"), ("born", "date"), ("seen", "timestamptz")]);
        let sql = build_select_query("public", "authors", &columns, Some("id")).unwrap();
        assert_eq!(
            sql,
            r#"SELECT "id", to_json("born") #>> '{}', to_json("seen") #>> '{}' FROM "public"."authors" ORDER BY "id" ASC"#
        );
    }

    #[test]
    fn test_select_query_quotes_hostile_names() {
        let columns = cols(&[("a\"b", "text")]);
        let sql = build_select_query("public", "t\"; DROP TABLE x; --", &columns, None).unwrap();
        assert_eq!(
            sql,
            r#"SELECT "a""b" FROM "public"."t""; DROP TABLE x; --""#
        );
    }

    #[test]
    fn test_select_query_rejects_null_byte() {
        let columns = cols(&[("bad\0name", "text")]);
        assert!(build_select_query("public", "t", &columns, None).is_err());
    }
}
