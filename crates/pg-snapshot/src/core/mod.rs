//! Core abstractions shared by the backup routine and the database driver.
//!
//! - [`schema`]: table and column metadata
//! - [`value`]: SQL values and their JSON encoding
//! - [`traits`]: the [`CatalogReader`] seam between routine and driver
//! - [`identifier`]: identifier validation and quoting

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{Column, ColumnKind, Table};
pub use traits::CatalogReader;
pub use value::SqlValue;
