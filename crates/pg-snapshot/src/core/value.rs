//! SQL value types and their snapshot (JSON) encoding.
//!
//! Every value read from the database becomes a [`SqlValue`]. The snapshot
//! file only holds JSON primitives, so [`SqlValue::to_json`] decides the
//! encoding per variant. Fixed-precision decimals are written as their exact
//! text (`123.450` stays `"123.450"`), never as a float.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use uuid::Uuid;

/// SQL value enum for type-safe row handling.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL.
    Null,

    /// Boolean value.
    Bool(bool),

    /// 16-bit signed integer (smallint).
    I16(i16),

    /// 32-bit signed integer (int).
    I32(i32),

    /// 64-bit signed integer (bigint).
    I64(i64),

    /// 32-bit floating point (real/float4).
    F32(f32),

    /// 64-bit floating point (double precision/float8).
    F64(f64),

    /// Fixed-precision decimal; the scale is preserved.
    Decimal(Decimal),

    /// Text data, also used for types that are fetched as text
    /// (numerics `Decimal` cannot hold, dates and timestamps, unknown types).
    Text(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// UUID value.
    Uuid(Uuid),

    /// json/jsonb document.
    Json(Value),

    /// Time without date component.
    Time(NaiveTime),
}

impl SqlValue {
    /// Build a value from the text form of a `numeric`.
    ///
    /// Values `Decimal` can hold exactly become [`SqlValue::Decimal`]. `NaN`
    /// and values with more than 28 significant digits stay as their exact text.
    pub fn from_numeric_text(text: String) -> Self {
        match Decimal::from_str_exact(&text) {
            Ok(d) => SqlValue::Decimal(d),
            Err(_) => SqlValue::Text(text),
        }
    }

    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Encode the value for the snapshot file.
    pub fn to_json(&self) -> Value {
        match self {
            SqlValue::Null => Value::Null,
            SqlValue::Bool(v) => Value::Bool(*v),
            SqlValue::I16(v) => Value::from(*v),
            SqlValue::I32(v) => Value::from(*v),
            SqlValue::I64(v) => Value::from(*v),
            // Go through the shortest decimal text so 0.1f32 stays 0.1.
            SqlValue::F32(v) => float_to_json(v.to_string().parse().unwrap_or(f64::NAN)),
            SqlValue::F64(v) => float_to_json(*v),
            SqlValue::Decimal(v) => Value::String(v.to_string()),
            SqlValue::Text(v) => Value::String(v.clone()),
            SqlValue::Bytes(v) => Value::String(format!("\\x{}", hex::encode(v))),
            SqlValue::Uuid(v) => Value::String(v.hyphenated().to_string()),
            SqlValue::Json(v) => v.clone(),
            SqlValue::Time(v) => Value::String(v.format("%H:%M:%S%.f").to_string()),
        }
    }
}

/// JSON has no NaN or infinities; those are written as strings.
fn float_to_json(v: f64) -> Value {
    match Number::from_f64(v) {
        Some(n) => Value::Number(n),
        None if v.is_nan() => Value::String("NaN".into()),
        None if v.is_sign_positive() => Value::String("Infinity".into()),
        None => Value::String("-Infinity".into()),
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}
