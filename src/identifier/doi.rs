use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub const RESOLVER_HOST: &str = "doi.org/";

/// Resolver URL for a bare DOI, e.g. `https://doi.org/10.1093/mnras/stab123`.
pub fn to_url(doi: &str) -> String {
    format!("https://doi.org/{}", encode_path(doi.trim()))
}

/// Whether `url` points at a DOI resolver (doi.org or dx.doi.org).
pub fn is_resolver_url(url: &str) -> bool {
    url.contains(RESOLVER_HOST)
}

/// Percent-encode characters that are not allowed verbatim in a URL path. Slashes are kept.
pub fn encode_path(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT_ENCODE_SET).to_string()
}
