//! Shared reader for reference catalogs.
//!
//! Catalog services hand us either TOML (`[[rules]]` tables, the embedded
//! format) or JSON (a bare array, or an object holding the array under the
//! same key).

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;

/// Read the list stored under `key` from a TOML or JSON catalog file.
/// Files ending in `.json` are read as JSON; anything else as TOML.
pub fn load_catalog_items<T: DeserializeOwned>(path: &Path, key: &str) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        parse_json_items(&content, key)
    } else {
        parse_toml_items(&content, key)
    }
    .with_context(|| format!("Invalid catalog in {}", path.display()))
}

/// Parse a TOML document and take the array of tables under `key`.
pub fn parse_toml_items<T: DeserializeOwned>(content: &str, key: &str) -> Result<Vec<T>> {
    let mut table: toml::Table = toml::from_str(content)?;
    let items = table
        .remove(key)
        .ok_or_else(|| anyhow!("missing `{}` array", key))?;
    Ok(items.try_into::<Vec<T>>()?)
}

/// Parse a JSON document: either a bare array or an object with `key`.
pub fn parse_json_items<T: DeserializeOwned>(content: &str, key: &str) -> Result<Vec<T>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let items = match value {
        serde_json::Value::Array(rows) => serde_json::Value::Array(rows),
        serde_json::Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| anyhow!("missing `{}` array", key))?,
        _ => return Err(anyhow!("expected an array or an object with `{}`", key)),
    };
    Ok(serde_json::from_value(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::Builder;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        name: String,
        qty: u32,
    }

    #[test]
    fn test_parse_toml_items() {
        let rows: Vec<Row> =
            parse_toml_items("[[rows]]\nname = \"a\"\nqty = 1\n\n[[rows]]\nname = \"b\"\nqty = 2\n", "rows")
                .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "b");
    }

    #[test]
    fn test_parse_toml_missing_key() {
        let err = parse_toml_items::<Row>("[[other]]\nname = \"a\"\nqty = 1\n", "rows").unwrap_err();
        assert!(err.to_string().contains("rows"));
    }

    #[test]
    fn test_parse_json_bare_array_and_object() {
        let bare: Vec<Row> = parse_json_items(r#"[{"name": "a", "qty": 3}]"#, "rows").unwrap();
        assert_eq!(bare, vec![Row { name: "a".to_string(), qty: 3 }]);

        let wrapped: Vec<Row> =
            parse_json_items(r#"{"rows": [{"name": "b", "qty": 4}]}"#, "rows").unwrap();
        assert_eq!(wrapped[0].qty, 4);

        assert!(parse_json_items::<Row>("42", "rows").is_err());
    }

    #[test]
    fn test_load_catalog_items_by_extension() {
        let mut json = Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"[{{"name": "j", "qty": 1}}]"#).unwrap();
        let rows: Vec<Row> = load_catalog_items(json.path(), "rows").unwrap();
        assert_eq!(rows[0].name, "j");

        let mut toml_file = Builder::new().suffix(".toml").tempfile().unwrap();
        write!(toml_file, "[[rows]]\nname = \"t\"\nqty = 2\n").unwrap();
        let rows: Vec<Row> = load_catalog_items(toml_file.path(), "rows").unwrap();
        assert_eq!(rows[0].name, "t");
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let err = load_catalog_items::<Row>(Path::new("/nonexistent/catalog.toml"), "rows").unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog"));
    }
}
