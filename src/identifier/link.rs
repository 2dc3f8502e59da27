use crate::identifier::doi;

const ADS_ABS: &str = "https://ui.adsabs.harvard.edu/abs/";
const ADS_HOME: &str = "https://ui.adsabs.harvard.edu/";
const PREPRINT_HOST: &str = "arxiv.org";

/// Publisher hosts whose landing pages are preferred over a DOI redirect.
///
/// NOTE: Ordering doesn't matter here; the first identifier URL that matches any of these wins.
static PUBLISHER_DOMAINS: &[&str] = &[
    // A&A (EDP)
    "aanda.org",
    "edpsciences.org",
    // OUP / MNRAS
    "academic.oup.com",
    "oxfordacademic.com",
    // IOP (ApJ, AJ)
    "iopscience.iop.org",
    "nature.com",
    "science.org",
    "springer.com",
    "onlinelibrary.wiley.com",
    "cambridge.org",
    "ras.ac.uk",
];

/// ADS abstract page for a record.
pub fn ads_url(bibcode: &str, identifiers: &[String]) -> String {
    if !bibcode.is_empty() {
        return format!("{ADS_ABS}{}", doi::encode_path(bibcode));
    }
    identifiers
        .iter()
        .find(|x| x.contains("ui.adsabs.harvard.edu/abs/"))
        .cloned()
        .unwrap_or_else(|| ADS_HOME.to_string())
}

/// Pick the link a record title should point at.
///
/// Preference: publisher landing page from the identifier list, then `https://doi.org/<doi>`,
/// then any DOI resolver URL from the identifier list, then `fallback`. arXiv URLs are never
/// chosen; the website shows those separately.
pub fn primary_url(doi: &str, identifiers: &[String], fallback: &str) -> String {
    let mut resolver_url: Option<&str> = None;
    for x in identifiers.iter().filter(|x| x.starts_with("http")) {
        if x.contains(PREPRINT_HOST) {
            continue;
        }
        if PUBLISHER_DOMAINS.iter().any(|dom| x.contains(dom)) {
            return x.clone();
        }
        if resolver_url.is_none() && doi::is_resolver_url(x) {
            resolver_url = Some(x.as_str());
        }
    }

    if !doi.trim().is_empty() {
        return doi::to_url(doi);
    }
    resolver_url
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
