//! Fixture file loading.
//!
//! Reads the static JSON fixture files (teams, squads, matches, scorecards,
//! standings) from a data directory. Failures are typed so the seeding
//! pipeline can treat a missing file as "nothing to seed" and a malformed
//! file as a skip, never as an abort.

mod records;

pub use records::*;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while reading a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read and parse a single fixture file.
pub fn read_fixture<T: DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    if !path.exists() {
        return Err(FixtureError::Missing(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Coerce a loosely typed fixture field to an integer, defaulting to zero.
///
/// Stat fields in the source arrive as JSON numbers in some files and as
/// numeric strings in others; both parse, anything else is zero.
pub fn int_or_zero(value: Option<&Value>) -> i64 {
    int_opt(value).unwrap_or(0)
}

/// Coerce a loosely typed fixture field to an integer, `None` when absent
/// or unparseable.
pub fn int_opt(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Coerce a loosely typed fixture field to a float.
///
/// Rate fields stay `None` when absent or unparseable: "not computed" is a
/// different fact from zero.
pub fn float_opt(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerce a loosely typed fixture field to a string. Numbers are rendered,
/// empty strings collapse to `None`.
pub fn string_opt(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_fixture_missing() {
        let result = read_fixture::<Vec<RawTeam>>(Path::new("/nonexistent/teams.json"));
        assert!(matches!(result, Err(FixtureError::Missing(_))));
    }

    #[test]
    fn test_read_fixture_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teams.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = read_fixture::<Vec<RawTeam>>(&path);
        assert!(matches!(result, Err(FixtureError::Parse(_))));
    }

    #[test]
    fn test_read_fixture_teams() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teams.json");
        std::fs::write(
            &path,
            r#"[{"tid": 101, "title": "Chennai Super Kings", "abbr": "CSK"}]"#,
        )
        .unwrap();

        let teams: Vec<RawTeam> = read_fixture(&path).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].tid, 101);
        assert_eq!(teams[0].abbr.as_deref(), Some("CSK"));
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(int_or_zero(Some(&json!(42))), 42);
        assert_eq!(int_or_zero(Some(&json!("42"))), 42);
        assert_eq!(int_or_zero(Some(&json!("14.5"))), 14);
        assert_eq!(int_or_zero(Some(&json!("not a number"))), 0);
        assert_eq!(int_or_zero(Some(&json!(null))), 0);
        assert_eq!(int_or_zero(None), 0);
    }

    #[test]
    fn test_float_coercion_defaults_to_none() {
        assert_eq!(float_opt(Some(&json!(8.25))), Some(8.25));
        assert_eq!(float_opt(Some(&json!("8.25"))), Some(8.25));
        assert_eq!(float_opt(Some(&json!(""))), None);
        assert_eq!(float_opt(Some(&json!(null))), None);
        assert_eq!(float_opt(None), None);
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(string_opt(Some(&json!("20"))), Some("20".to_string()));
        assert_eq!(string_opt(Some(&json!(20))), Some("20".to_string()));
        assert_eq!(string_opt(Some(&json!(""))), None);
        assert_eq!(string_opt(None), None);
    }
}
