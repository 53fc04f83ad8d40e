//! Core trait for reading schema and rows out of a database.

use async_trait::async_trait;

use crate::error::Result;

use super::schema::Column;
use super::value::SqlValue;

/// Read catalog metadata and table contents from a database.
///
/// The backup routine only talks to this trait, so it runs the same way
/// against PostgreSQL ([`crate::drivers::postgres::PgReader`]) and against
/// in-memory readers in tests.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// List the tables of `schema`, ordered by name.
    ///
    /// Views are only included when `include_views` is set.
    async fn list_tables(&self, schema: &str, include_views: bool) -> Result<Vec<String>>;

    /// List the columns of a table in ordinal order.
    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<Column>>;

    /// Fetch every row of a table.
    ///
    /// Each row holds one value per entry of `columns`, in the same order.
    /// When `order_by` is set rows come back in ascending order of that
    /// column; otherwise the order is whatever the database returns.
    async fn fetch_rows(
        &self,
        schema: &str,
        table: &str,
        columns: &[Column],
        order_by: Option<&str>,
    ) -> Result<Vec<Vec<SqlValue>>>;

    /// Database type identifier for logging.
    fn db_type(&self) -> &str;

    /// Release the connection. Called once, after the last query.
    async fn close(self)
    where
        Self: Sized;
}
