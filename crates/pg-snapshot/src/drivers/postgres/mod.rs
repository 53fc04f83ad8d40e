//! PostgreSQL driver.
//!
//! - [`PgReader`]: single-connection catalog and row reader

mod reader;

pub use reader::PgReader;
