use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Poster lookup capability. The production implementation talks to OMDb;
/// tests substitute a deterministic stub. Lookup failure is never an error,
/// only the absence of a poster.
#[async_trait]
pub trait PosterLookup: Send + Sync {
    async fn resolve_poster(&self, title: &str, year: Option<i32>) -> Option<String>;
}

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        // Warn once on app load if poster lookups are disabled
        if api_key.trim().is_empty() {
            warn!("no OMDB_API_KEY provided, poster lookups disabled");
        }
        Self { client, api_key, base_url }
    }

    async fn lookup(&self, title: &str, year: Option<i32>) -> Result<OmdbLookup, reqwest::Error> {
        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        let mut req = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)]);
        if let Some(year) = year {
            req = req.query(&[("y", year)]);
        }
        req.send().await?.error_for_status()?.json().await
    }
}

#[async_trait]
impl PosterLookup for OmdbClient {
    async fn resolve_poster(&self, title: &str, year: Option<i32>) -> Option<String> {
        if self.api_key.trim().is_empty() {
            debug!(title = %title, "skipping poster lookup");
            return None;
        }

        match self.lookup(title, year).await {
            Ok(resp) => poster_from_lookup(resp),
            Err(err) => {
                warn!(title = %title, error = %err, "poster lookup failed");
                None
            },
        }
    }
}

/// OMDb reports "no image" as the literal string "N/A" rather than omitting
/// the field.
fn poster_from_lookup(resp: OmdbLookup) -> Option<String> {
    if resp.response != "True" {
        return None;
    }
    resp.poster.filter(|p| p != "N/A")
}

#[derive(Debug, Deserialize)]
struct OmdbLookup {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}
