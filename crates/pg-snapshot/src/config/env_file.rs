//! Minimal `KEY=VALUE` env file reader.
//!
//! Each line is trimmed and split on `=`. Only lines that split into exactly
//! two parts are kept; anything else (blank lines, `#` comments, values that
//! themselves contain `=`) is skipped. There is no quoting or escaping.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, SnapshotError};

/// Parse env file content into a key/value map. Later keys overwrite earlier ones.
pub fn parse_str(content: &str) -> HashMap<String, String> {
    let mut env = HashMap::new();
    for line in content.lines() {
        let parts: Vec<&str> = line.trim().split('=').collect();
        if let [key, value] = parts.as_slice() {
            env.insert((*key).to_string(), (*value).to_string());
        }
    }
    env
}

/// Read and parse an env file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        SnapshotError::Config(format!("cannot read env file {}: {}", path.display(), e))
    })?;
    Ok(parse_str(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_pairs() {
        let env = parse_str("DATABASE_URL=postgres://u:p@db/app\nPORT=8080\n");
        assert_eq!(env.get("DATABASE_URL").unwrap(), "postgres://u:p@db/app");
        assert_eq!(env.get("PORT").unwrap(), "8080");
    }

    #[test]
    fn test_lines_without_exactly_one_equals_are_ignored() {
        let env = parse_str("NOVALUE\nURL=postgres://h/db?sslmode=require\nA=b\n");
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("A").unwrap(), "b");
    }

    #[test]
    fn test_whitespace_trimmed_and_no_quote_handling() {
        let env = parse_str("   KEY=\"quoted\"   \r\n");
        assert_eq!(env.get("KEY").unwrap(), "\"quoted\"");
    }

    #[test]
    fn test_empty_value_kept() {
        let env = parse_str("EMPTY=\n");
        assert_eq!(env.get("EMPTY").unwrap(), "");
    }

    #[test]
    fn test_later_duplicate_wins() {
        let env = parse_str("A=1\nA=2\n");
        assert_eq!(env.get("A").unwrap(), "2");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = load("/nonexistent/dir/.env").unwrap_err();
        assert!(matches!(err, SnapshotError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DATABASE_URL=postgres://localhost/app").unwrap();
        let env = load(file.path()).unwrap();
        assert_eq!(env.get("DATABASE_URL").unwrap(), "postgres://localhost/app");
    }
}
