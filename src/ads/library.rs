//! ADS libraries: resolve a library by name and list its bibcodes.

use anyhow::{bail, ensure};
use serde_json::Value;

use crate::ads::Upstream;

/// Id of the library called exactly `name`.
pub fn find_library_id(api: &impl Upstream, name: &str) -> anyhow::Result<String> {
    let listing = api.list_libraries()?;
    let entries = library_entries(&listing);
    if let Some((_, id)) = entries.iter().find(|(n, _)| n == name) {
        log::debug!("library \"{name}\" has id {id}");
        return Ok(id.clone());
    }
    let names = entries
        .iter()
        .map(|(n, _)| n.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    bail!("Library \"{name}\" not found. Available: {names}")
}

/// Bibcodes of every document in library `id`. An empty library is an error.
pub fn library_bibcodes(api: &impl Upstream, id: &str) -> anyhow::Result<Vec<String>> {
    let body = api.library(id)?;
    let bibcodes = document_bibcodes(&body);
    ensure!(!bibcodes.is_empty(), "No bibcodes found in library.");
    log::info!("library {id}: {} bibcodes", bibcodes.len());
    Ok(bibcodes)
}

/// `(name, id)` pairs from a `/biblib/libraries` listing.
fn library_entries(listing: &Value) -> Vec<(String, String)> {
    listing
        .get("libraries")
        .and_then(Value::as_array)
        .map(|libs| {
            libs.iter()
                .map(|lib| {
                    let field = |k: &str| lib.get(k).and_then(Value::as_str).unwrap_or_default().to_string();
                    (field("name"), field("id"))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Bibcodes from a library body. Documents are listed under `documents` (or `docs` in older
/// responses), either as plain bibcodes or as objects with a `bibcode` key.
fn document_bibcodes(body: &Value) -> Vec<String> {
    let docs = ["documents", "docs"]
        .iter()
        .filter_map(|k| body.get(*k).and_then(Value::as_array))
        .find(|d| !d.is_empty());
    let Some(docs) = docs else {
        return Vec::new();
    };
    docs.iter()
        .filter_map(|d| match d {
            Value::String(s) => Some(s.as_str()),
            Value::Object(o) => o.get("bibcode").and_then(Value::as_str),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
