//! JSON output formatting.
//!
//! Saving merges into whatever the file already holds: an object gains (or
//! replaces) the report under its target key, an array gets the report
//! appended, and anything else is overwritten.

use super::ScanReport;
use crate::error::OutputResult;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;

/// Print results in JSON format.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

fn read_existing(path: &Path) -> OutputResult<Option<Value>> {
    match fs::read_to_string(path) {
        // Unparseable content is treated like a scalar and replaced.
        Ok(content) => Ok(serde_json::from_str(&content).ok()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Merge a report into a JSON file.
pub fn save_json(path: &Path, report: &ScanReport) -> OutputResult<()> {
    let entry = serde_json::to_value(report)?;

    let merged = match read_existing(path)? {
        Some(Value::Object(mut map)) => {
            map.insert(report.target.clone(), entry);
            Value::Object(map)
        }
        Some(Value::Array(mut items)) => {
            items.push(entry);
            Value::Array(items)
        }
        _ => {
            let mut map = Map::new();
            map.insert(report.target.clone(), entry);
            Value::Object(map)
        }
    };

    fs::write(path, serde_json::to_string_pretty(&merged)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    fn read(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_new_file_is_keyed_by_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");

        save_json(&path, &sample_report("10.0.0.1", &[22])).unwrap();

        let value = read(&path);
        assert_eq!(value["10.0.0.1"]["open_ports"], serde_json::json!([22]));
        assert_eq!(value["10.0.0.1"]["probed_count"], 71);
    }

    #[test]
    fn test_merges_into_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        fs::write(&path, r#"{"keep": 1, "10.0.0.1": "stale"}"#).unwrap();

        save_json(&path, &sample_report("10.0.0.1", &[80])).unwrap();

        let value = read(&path);
        assert_eq!(value["keep"], 1);
        assert_eq!(value["10.0.0.1"]["open_ports"], serde_json::json!([80]));
    }

    #[test]
    fn test_appends_to_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        fs::write(&path, "[1]").unwrap();

        save_json(&path, &sample_report("a", &[])).unwrap();
        save_json(&path, &sample_report("b", &[])).unwrap();

        let items = read(&path);
        let items = items.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2]["target"], "b");
    }

    #[test]
    fn test_overwrites_scalar_and_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");

        fs::write(&path, "42").unwrap();
        save_json(&path, &sample_report("x", &[1])).unwrap();
        assert!(read(&path).get("x").is_some());

        fs::write(&path, "not json {").unwrap();
        save_json(&path, &sample_report("y", &[])).unwrap();
        let value = read(&path);
        assert!(value.get("y").is_some());
        assert!(value.get("x").is_none());
    }
}
