//! Table and column metadata discovered from the catalog.

use serde::{Deserialize, Serialize};

/// Column whose presence switches row extraction to ascending key order.
pub const ORDER_KEY_COLUMN: &str = "id";

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Catalog type name (`information_schema.columns.udt_name`, e.g. `int4`, `numeric`).
    pub data_type: String,

    /// Ordinal position (1-based).
    pub ordinal_pos: i32,
}

impl Column {
    /// Create a column definition.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, ordinal_pos: i32) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ordinal_pos,
        }
    }

    /// Decoding strategy for this column's values.
    pub fn kind(&self) -> ColumnKind {
        ColumnKind::from_pg_type(&self.data_type)
    }
}

/// How the values of a column are fetched and decoded.
///
/// Types without a native decoder are selected as text and kept as text, so
/// every column of every table can be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Fixed-precision `numeric`, fetched as text to keep every digit.
    Numeric,
    Text,
    Uuid,
    Json,
    /// `timestamp`, `timestamptz` and `date` are rendered as ISO 8601 text by
    /// the server. `infinity` and years past chrono's range stay readable.
    Timestamp,
    TimestampTz,
    Date,
    Time,
    Bytea,
    /// Anything else (enums, arrays, intervals, ...), fetched as `::text`.
    Other,
}

impl ColumnKind {
    /// Classify a PostgreSQL type name.
    pub fn from_pg_type(type_name: &str) -> Self {
        let lower = type_name.to_lowercase();
        match lower.as_str() {
            "bool" | "boolean" => ColumnKind::Bool,
            "int2" | "smallint" => ColumnKind::Int16,
            "int4" | "integer" | "int" => ColumnKind::Int32,
            "int8" | "bigint" => ColumnKind::Int64,
            "float4" | "real" => ColumnKind::Float32,
            "float8" | "double precision" => ColumnKind::Float64,
            "numeric" | "decimal" => ColumnKind::Numeric,
            "text" | "varchar" | "character varying" | "bpchar" | "character" | "name"
            | "citext" => ColumnKind::Text,
            "uuid" => ColumnKind::Uuid,
            "json" | "jsonb" => ColumnKind::Json,
            "timestamp" | "timestamp without time zone" => ColumnKind::Timestamp,
            "timestamptz" | "timestamp with time zone" => ColumnKind::TimestampTz,
            "date" => ColumnKind::Date,
            "time" | "time without time zone" => ColumnKind::Time,
            "bytea" => ColumnKind::Bytea,
            _ => ColumnKind::Other,
        }
    }

    /// SELECT-list expression for a column, given its quoted name.
    pub fn select_expr(&self, quoted: &str) -> String {
        match self {
            ColumnKind::Numeric | ColumnKind::Other => format!("{}::text", quoted),
            // json renders these in ISO 8601 whatever the session DateStyle is.
            ColumnKind::Timestamp | ColumnKind::TimestampTz | ColumnKind::Date => {
                format!("to_json({}) #>> '{{}}'", quoted)
            }
            _ => quoted.to_string(),
        }
    }
}

/// A discovered table and its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Schema name.
    pub schema: String,

    /// Table name.
    pub name: String,

    /// Column definitions in ordinal order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Get the fully qualified table name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Column names in ordinal order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Column to order rows by, if the table has one named `id`.
    pub fn order_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.name == ORDER_KEY_COLUMN)
            .map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> Table {
        Table {
            schema: "public".into(),
            name: "books".into(),
            columns: columns
                .iter()
                .enumerate()
                .map(|(i, name)| Column::new(*name, "text", i as i32 + 1))
                .collect(),
        }
    }

    #[test]
    fn test_column_kind_classification() {
        assert_eq!(ColumnKind::from_pg_type("int4"), ColumnKind::Int32);
        assert_eq!(ColumnKind::from_pg_type("NUMERIC"), ColumnKind::Numeric);
        assert_eq!(ColumnKind::from_pg_type("varchar"), ColumnKind::Text);
        assert_eq!(ColumnKind::from_pg_type("jsonb"), ColumnKind::Json);
        assert_eq!(ColumnKind::from_pg_type("timestamptz"), ColumnKind::TimestampTz);
        assert_eq!(ColumnKind::from_pg_type("_int4"), ColumnKind::Other);
        assert_eq!(ColumnKind::from_pg_type("interval"), ColumnKind::Other);
    }

    #[test]
    fn test_select_expr_per_kind() {
        assert_eq!(ColumnKind::Numeric.select_expr("\"p\""), "\"p\"::text");
        assert_eq!(ColumnKind::Other.select_expr("\"tags\""), "\"tags\"::text");
        assert_eq!(ColumnKind::Int64.select_expr("\"id\""), "\"id\"");
        assert_eq!(ColumnKind::Text.select_expr("\"name\""), "\"name\"");
        assert_eq!(ColumnKind::Time.select_expr("\"at\""), "\"at\"");
    }

    #[test]
    fn test_dates_and_timestamps_fetched_as_iso_text() {
        for ty in ["timestamp", "timestamptz", "date"] {
            let kind = ColumnKind::from_pg_type(ty);
            assert_eq!(kind.select_expr("\"at\""), "to_json(\"at\") #>> '{}'");
        }
        assert_eq!(ColumnKind::Bytea.select_expr("\"raw\""), "\"raw\"");
    }

    #[test]
    fn test_order_column_requires_exact_id() {
        assert_eq!(table(&["id", "title"]).order_column(), Some("id"));
        assert_eq!(table(&["ID", "title"]).order_column(), None);
        assert_eq!(table(&["book_id", "title"]).order_column(), None);
    }

    #[test]
    fn test_column_names_keep_order() {
        let t = table(&["title", "id", "price"]);
        assert_eq!(t.column_names(), vec!["title", "id", "price"]);
        assert_eq!(t.full_name(), "public.books");
    }
}
