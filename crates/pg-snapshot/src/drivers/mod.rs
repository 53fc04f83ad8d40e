//! Database driver implementations.
//!
//! - [`postgres`]: PostgreSQL [`CatalogReader`](crate::core::CatalogReader)
//! - [`common`]: shared connection utilities (TLS)

pub mod common;
pub mod postgres;

pub use common::{SslMode, TlsBuilder};
pub use postgres::PgReader;
