use std::time::Duration;

use anyhow::{Context, bail};
use serde_json::{Value, json};
use ureq::{Agent, Body, http::Response};
use url::Url;

use crate::ads::Upstream;

const USER_AGENT: &str = concat!("ads-pubs/", env!("CARGO_PKG_VERSION"));
const LIBRARY_ROWS: &str = "2000";
const EXCERPT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            connect: Duration::from_secs(10),
            request: Duration::from_secs(60),
        }
    }
}

/// Blocking ADS client authenticated with a bearer token.
pub struct AdsClient {
    agent: Agent,
    base: String,
    auth: String,
}

impl AdsClient {
    pub fn new(base_url: &str, token: &str, timeouts: Timeouts) -> anyhow::Result<Self> {
        Url::parse(base_url).with_context(|| format!("invalid ADS API URL: {base_url}"))?;
        let cfg = Agent::config_builder()
            .timeout_connect(Some(timeouts.connect))
            .timeout_global(Some(timeouts.request))
            // Status codes are checked by hand so error messages can quote the response body.
            .http_status_as_error(false)
            .build();
        Ok(AdsClient {
            agent: Agent::new_with_config(cfg),
            base: base_url.trim_end_matches('/').to_string(),
            auth: format!("Bearer {token}"),
        })
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        let raw = format!("{}/{}", self.base, path.trim_start_matches('/'));
        Url::parse(&raw).with_context(|| format!("invalid endpoint URL: {raw}"))
    }

    fn get(&self, url: &Url) -> anyhow::Result<Response<Body>> {
        log::debug!("GET {url}");
        self.agent
            .get(url.as_str())
            .header("Authorization", self.auth.as_str())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .call()
            .with_context(|| format!("request to {url} failed"))
    }

    fn post_json(&self, url: &Url, payload: &Value) -> anyhow::Result<Response<Body>> {
        log::debug!("POST {url}");
        let body = serde_json::to_vec(payload).context("failed to encode request body")?;
        self.agent
            .post(url.as_str())
            .header("Authorization", self.auth.as_str())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .send(&body[..])
            .with_context(|| format!("request to {url} failed"))
    }
}

impl Upstream for AdsClient {
    fn list_libraries(&self) -> anyhow::Result<Value> {
        let mut url = self.endpoint("biblib/libraries")?;
        url.query_pairs_mut().append_pair("rows", LIBRARY_ROWS);
        parse_json(read_success(self.get(&url)?, &url)?, &url)
    }

    fn library(&self, id: &str) -> anyhow::Result<Value> {
        let base = format!("biblib/libraries/{id}");
        // Some deployments only answer on one of the two path forms.
        for path in [base.clone(), format!("{base}/")] {
            let mut url = self.endpoint(&path)?;
            url.query_pairs_mut().append_pair("rows", LIBRARY_ROWS);
            let res = self.get(&url)?;
            if res.status().as_u16() == 404 {
                log::debug!("library {id}: 404 at {url}");
                continue;
            }
            return parse_json(read_success(res, &url)?, &url);
        }
        bail!(
            "Library {id} not found at {}/{base} (tried with and without trailing slash).",
            self.base
        )
    }

    fn search(&self, query: &str, fields: &[&str], rows: usize) -> anyhow::Result<Value> {
        let mut url = self.endpoint("search/query")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("fl", &fields.join(","))
            .append_pair("rows", &rows.to_string());
        parse_json(read_success(self.get(&url)?, &url)?, &url)
    }

    fn export_bibtex(&self, bibcodes: &[String]) -> anyhow::Result<String> {
        let url = self.endpoint("export/bibtex")?;
        let res = self.post_json(&url, &json!({ "bibcode": bibcodes }))?;
        let body = parse_json(read_success(res, &url)?, &url)?;
        Ok(body
            .get("export")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    fn metrics(&self, bibcodes: &[String]) -> anyhow::Result<Value> {
        let url = self.endpoint("metrics")?;
        let res = self.post_json(&url, &json!({ "bibcodes": bibcodes }))?;
        match parse_json(read_success(res, &url)?, &url)? {
            Value::Null => Ok(json!({})),
            v => Ok(v),
        }
    }
}

/// Body of a 2xx response; any other status becomes an error quoting the start of the body.
fn read_success(mut res: Response<Body>, url: &Url) -> anyhow::Result<String> {
    let status = res.status();
    let body = res.body_mut().read_to_string();
    if !status.is_success() {
        let text = body.unwrap_or_default();
        bail!(
            "{} {} for {url}\nResponse: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            excerpt(&text, EXCERPT_CHARS)
        );
    }
    body.with_context(|| format!("failed to read response body from {url}"))
}

fn parse_json(body: String, url: &Url) -> anyhow::Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).with_context(|| format!("invalid JSON from {url}"))
}

fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
