//! YAML data files.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_yaml::Value;

use crate::ads::doc::parse_int;
use crate::record::Record;

/// Serialise `value` to `path`, replacing any previous content. Missing parent directories are
/// created.
pub fn write_yaml<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let text = serde_yaml::to_string(value).context("failed to serialise YAML")?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Records previously written to `path`. An empty file holds no records.
pub fn read_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Option<Vec<Record>> = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse records in {}", path.display()))?;
    Ok(records.unwrap_or_default())
}

/// `delta_year` stored in an existing metrics file, at the top level or under `metrics`.
/// Missing files and unreadable values yield `None`.
pub fn read_existing_delta_year(path: &Path) -> Option<i64> {
    let text = fs::read_to_string(path).ok()?;
    let doc: Value = serde_yaml::from_str(&text).ok()?;
    [doc.get("delta_year"), doc.get("metrics").and_then(|m| m.get("delta_year"))]
        .into_iter()
        .flatten()
        .find_map(year_of)
}

fn year_of(v: &Value) -> Option<i64> {
    let year = match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        Value::String(s) => parse_int(s),
        _ => return None,
    };
    (year != 0).then_some(year)
}
