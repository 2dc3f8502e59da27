use serde_json::{Map, Value};

/// One document from `/search/query`, kept as raw JSON.
///
/// ADS field types drift (lists vs. scalars, numbers vs. strings), so every accessor tolerates
/// the shapes seen in the wild and falls back to an empty value instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDoc(Map<String, Value>);

impl RawDoc {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(RawDoc(map)),
            _ => None,
        }
    }

    /// Scalar text of `key`; for a list, its first element.
    pub fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::Array(items)) => items.first().map(scalar_text).unwrap_or_default(),
            Some(v) => scalar_text(v),
            None => String::new(),
        }
    }

    /// Text items of `key`; a scalar becomes a one-element list.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(scalar_text)
                .filter(|s| !s.is_empty())
                .collect(),
            Some(v) => Some(scalar_text(v)).filter(|s| !s.is_empty()).into_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn count(&self, key: &str) -> u64 {
        self.0
            .get(key)
            .map(|v| u64::try_from(coerce_int(v)).unwrap_or(0))
            .unwrap_or(0)
    }
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Integer value of a JSON scalar; anything non-numeric is zero.
pub fn coerce_int(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_int(s),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Integer value of a string such as `"12"`, `" 12 "` or `"12.0"`; zero otherwise.
pub fn parse_int(s: &str) -> i64 {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        .unwrap_or(0)
}
