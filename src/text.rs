//! Text cleanup shared by the record mapper, owner detection and tagging.

use once_cell::sync::Lazy;
use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Lowercase, strip accents and collapse whitespace.
///
/// Every identity or keyword comparison in the crate goes through this function so that
/// "Villaseñor", "VILLASENOR" and "villasenor " all compare equal.
pub fn norm(s: &str) -> String {
    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();
    normalize_ws(&stripped).to_lowercase()
}

/// Strip ADS-provided HTML tags and entities and normalise whitespace.
pub fn clean_title(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }
    static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

    let unescaped = decode_entities(title);
    let untagged = TAG_RE.replace_all(&unescaped, "");
    normalize_ws(&untagged)
}

/// Decode HTML5 named entities and numeric references. Unknown entities are left untouched.
pub fn decode_entities(s: &str) -> String {
    static ENTITY_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap());

    ENTITY_RE
        .replace_all(s, |caps: &Captures<'_>| {
            let body = &caps[1];
            let numeric = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                Some(u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
            } else {
                body.strip_prefix('#')
                    .map(|dec| dec.parse::<u32>().ok().and_then(char::from_u32))
            };
            let decoded = match numeric {
                Some(c) => c.map(String::from),
                None => resolve_html5_entity(body).map(str::to_string),
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
