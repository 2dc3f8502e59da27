//! Author name display and owner emphasis.
//!
//! ADS returns authors as "Last, First Middle" (optionally "Last, First, Jr."). The website
//! shows them as "First Middle Last" and highlights the owner of the publication list.

use crate::text::norm;

const ET_AL: &str = ", <em>et&nbsp;al.</em>";

/// The author whose name is emphasised in rendered author lists.
#[derive(Debug, Clone)]
pub struct Owner {
    /// Accent/case-normalised surname variants.
    surnames: Vec<String>,
}

impl Owner {
    pub fn new<S: AsRef<str>>(surnames: &[S]) -> Self {
        Owner {
            surnames: surnames.iter().map(|s| norm(s.as_ref())).collect(),
        }
    }

    pub fn is_owner(&self, name: &str) -> bool {
        let last = norm(surname(name));
        !last.is_empty() && self.surnames.contains(&last)
    }

    /// Position of the first author entry that is the owner.
    pub fn position(&self, authors: &[String]) -> Option<usize> {
        authors.iter().position(|a| self.is_owner(a))
    }

    fn render(&self, name: &str) -> String {
        let display = display_name(name);
        if self.is_owner(name) {
            format!("<strong>{display}</strong>")
        } else {
            display
        }
    }
}

/// Surname part of an ADS author string: text before the first comma, otherwise the last word.
pub fn surname(name: &str) -> &str {
    match name.split_once(',') {
        Some((last, _)) => last,
        None => name.split_whitespace().last().unwrap_or(""),
    }
}

/// "Last, First Middle" -> "First Middle Last", keeping a generational suffix:
/// "Smith, John, Jr." -> "John Smith, Jr.". Names without a comma are returned as is.
pub fn display_name(name: &str) -> String {
    let Some((last, rest)) = name.split_once(',') else {
        return name.to_string();
    };
    let last = last.trim();
    let rest = rest.trim();
    match rest.split_once(',') {
        Some((first, suffix)) => format!("{} {}, {}", first.trim(), last, suffix.trim())
            .trim()
            .to_string(),
        None => format!("{rest} {last}").trim().to_string(),
    }
}

/// Full author list, `; `-separated, owner emphasised.
pub fn authors_html(authors: &[String], owner: &Owner) -> String {
    authors
        .iter()
        .map(|a| owner.render(a))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Author list capped at `max_authors` entries. When the cap would hide the owner, the last
/// visible slot is given to the owner instead. Truncated lists end with "et al.".
pub fn authors_short_html(authors: &[String], owner: &Owner, max_authors: usize) -> String {
    let cap = max_authors.max(1);
    let truncated = authors.len() > cap;

    let mut shown: Vec<&String> = authors.iter().take(cap).collect();
    if truncated
        && !shown.iter().any(|a| owner.is_owner(a))
        && let Some(idx) = owner.position(authors)
    {
        shown.truncate(cap - 1);
        shown.push(&authors[idx]);
    }

    let mut out = shown
        .into_iter()
        .map(|a| owner.render(a))
        .collect::<Vec<_>>()
        .join("; ");
    if truncated {
        out.push_str(ET_AL);
    }
    out
}
