//! MediaWiki link-graph source.
//!
//! Fetches a page's outgoing links (and its latest revision token) from the
//! MediaWiki action API. Link listings are paginated: the response carries a
//! `continue` object whose keys must be merged into the next request's
//! parameters until the server stops sending one.
//!
//! Failures here are recovered locally: a network or decode error returns
//! whatever was accumulated so far, so pathfinding degrades to
//! under-exploration instead of aborting. The flip side is that a partial
//! result is indistinguishable from a page that truly has few links; partial
//! returns are logged at warn level so the gap is at least observable.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;

/// Production MediaWiki endpoint.
const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Per-page-fetch request timeout.
const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// A source of outgoing links for pages.
///
/// The expansion layer depends on this trait, not on the HTTP client, so
/// tests substitute stub sources and the engine never needs a network.
/// Both methods are best-effort by contract: upstream failure yields partial
/// or empty data, never an error.
pub trait LinkSource {
    /// All outgoing link titles of `title` in the primary content namespace,
    /// in response order. Duplicates are passed through; the store dedups.
    fn resolve_links(&self, title: &str) -> Vec<String>;

    /// The latest revision token of `title`, or `None` if unavailable.
    fn resolve_revision(&self, title: &str) -> Option<String>;
}

/// `LinkSource` backed by the MediaWiki action API.
pub struct WikiLinkSource {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl WikiLinkSource {
    /// Create a source against the production Wikipedia endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a source against a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(PAGE_TIMEOUT)
            .user_agent(concat!("wikipath/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    fn fetch(&self, params: &[(String, String)]) -> std::result::Result<QueryResponse, reqwest::Error> {
        self.client
            .get(&self.endpoint)
            .query(params)
            .send()?
            .error_for_status()?
            .json()
    }
}

impl LinkSource for WikiLinkSource {
    fn resolve_links(&self, title: &str) -> Vec<String> {
        let mut params: Vec<(String, String)> = vec![
            ("action".into(), "query".into()),
            ("titles".into(), title.to_string()),
            ("prop".into(), "links".into()),
            // Only primary-namespace content links
            ("plnamespace".into(), "0".into()),
            ("pllimit".into(), "max".into()),
            ("format".into(), "json".into()),
            ("redirects".into(), "1".into()),
        ];

        let mut links = Vec::new();
        loop {
            let response = match self.fetch(&params) {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        title,
                        accumulated = links.len(),
                        error = %e,
                        "link fetch failed, returning partial results"
                    );
                    break;
                }
            };

            collect_link_titles(&response, &mut links);

            match response.cont {
                Some(cont) => merge_continue(&mut params, &cont),
                None => break,
            }
        }

        debug!(title, count = links.len(), "resolved links");
        links
    }

    fn resolve_revision(&self, title: &str) -> Option<String> {
        let params: Vec<(String, String)> = vec![
            ("action".into(), "query".into()),
            ("prop".into(), "revisions".into()),
            ("titles".into(), title.to_string()),
            ("rvslots".into(), "*".into()),
            ("rvprop".into(), "timestamp".into()),
            ("format".into(), "json".into()),
        ];

        match self.fetch(&params) {
            Ok(response) => first_revision_timestamp(&response),
            Err(e) => {
                warn!(title, error = %e, "revision fetch failed");
                None
            }
        }
    }
}

// === Wire format ===

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(default, rename = "continue")]
    cont: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PageBody {
    #[serde(default)]
    links: Vec<LinkEntry>,
    #[serde(default)]
    revisions: Vec<RevisionEntry>,
}

#[derive(Debug, Deserialize)]
struct LinkEntry {
    title: String,
}

#[derive(Debug, Deserialize)]
struct RevisionEntry {
    timestamp: String,
}

/// Append every link title in the response to `out`, preserving order.
fn collect_link_titles(response: &QueryResponse, out: &mut Vec<String>) {
    let Some(query) = &response.query else { return };

    for page_value in query.pages.values() {
        let Ok(page) = serde_json::from_value::<PageBody>(page_value.clone()) else {
            warn!("malformed page entry in links response, skipping");
            continue;
        };
        out.extend(page.links.into_iter().map(|link| link.title));
    }
}

/// Merge a `continue` object into the next request's parameters.
///
/// Continuation keys replace existing parameters of the same name; the
/// server decides which keys appear (`plcontinue`, `continue`, ...).
fn merge_continue(params: &mut Vec<(String, String)>, cont: &Map<String, Value>) {
    for (key, value) in cont {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match params.iter_mut().find(|(k, _)| k == key) {
            Some(param) => param.1 = value,
            None => params.push((key.clone(), value)),
        }
    }
}

/// Extract the first revision timestamp from a revisions response.
fn first_revision_timestamp(response: &QueryResponse) -> Option<String> {
    let query = response.query.as_ref()?;

    for page_value in query.pages.values() {
        let Ok(page) = serde_json::from_value::<PageBody>(page_value.clone()) else {
            continue;
        };
        if let Some(revision) = page.revisions.into_iter().next() {
            return Some(revision.timestamp);
        }
    }
    None
}
