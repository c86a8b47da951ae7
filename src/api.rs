//! Client for the public Iconify HTTP API.
//!
//! The API serves individual icons as SVG markup and catalog metadata as
//! JSON. All calls are blocking: the export pipeline processes icons
//! strictly one at a time, so there is nothing to overlap.
//!
//! [`IconSource`] is the seam between the pipeline and the network; tests
//! and embedders can substitute an in-memory source.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::icon::IconId;

/// Base URL of the public Iconify API.
pub const API_BASE: &str = "https://api.iconify.design";

/// Anything that can produce SVG markup for an icon identifier.
///
/// Implemented by [`IconifyClient`]; export pipelines are generic over this
/// trait so they can run against canned markup in tests.
pub trait IconSource {
    /// Returns the raw SVG markup for one icon.
    fn fetch_svg(&self, icon: &IconId) -> Result<String, Error>;
}

// ============================================================================
// IconifyClient
// ============================================================================

/// Blocking HTTP client for the Iconify API.
///
/// # Example
///
/// ```no_run
/// use iconify_downloader::{IconId, IconifyClient, IconSource};
///
/// let client = IconifyClient::new();
/// let id: IconId = "mdi:home".parse()?;
/// let svg = client.fetch_svg(&id)?;
/// assert!(svg.contains("<svg"));
/// # Ok::<(), iconify_downloader::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct IconifyClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl IconifyClient {
    /// Creates a client against the public API.
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    /// Creates a client against a different base URL (mirrors, tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("iconify-downloader/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { http, base_url }
    }

    /// Fetches one icon rendered at the service's native size.
    ///
    /// Fails with [`Error::Fetch`] naming the identifier on transport
    /// errors and non-2xx statuses. No retries; batch callers abort on the
    /// first failure.
    pub fn fetch_icon_svg(&self, icon: &IconId) -> Result<String, Error> {
        self.get_svg(format!("{}/{icon}.svg", self.base_url), icon)
    }

    /// Fetches one icon scaled to `height` pixels. This is the interactive
    /// preview path; pair it with a [`PreviewCache`](crate::PreviewCache)
    /// to avoid refetching while browsing.
    pub fn fetch_svg_sized(&self, icon: &IconId, height: u32) -> Result<String, Error> {
        self.get_svg(format!("{}/{icon}.svg?height={height}", self.base_url), icon)
    }

    /// Searches the catalog, optionally restricted to one prefix.
    pub fn search(
        &self,
        query: &str,
        limit: u32,
        prefix: Option<&str>,
    ) -> Result<SearchResults, Error> {
        let mut params = vec![
            ("query".to_string(), query.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        if let Some(prefix) = prefix {
            params.push(("prefix".to_string(), prefix.to_string()));
        }
        self.get_json(format!("{}/search", self.base_url), &params)
    }

    /// Fetches the icon listing of one collection.
    pub fn collection(&self, prefix: &str) -> Result<CollectionInfo, Error> {
        self.get_json(
            format!("{}/collection", self.base_url),
            &[("prefix".to_string(), prefix.to_string())],
        )
    }

    /// Fetches the catalog of all available collections, keyed by prefix.
    pub fn collections(&self) -> Result<BTreeMap<String, CollectionSummary>, Error> {
        self.get_json(format!("{}/collections", self.base_url), &[])
    }

    fn get_svg(&self, url: String, icon: &IconId) -> Result<String, Error> {
        let fetch_err = |source| Error::Fetch {
            icon: icon.to_string(),
            source,
        };
        let response = self.http.get(&url).send().map_err(fetch_err)?;
        let response = response.error_for_status().map_err(fetch_err)?;
        response.text().map_err(fetch_err)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        params: &[(String, String)],
    ) -> Result<T, Error> {
        let api_err = |source| Error::Api {
            endpoint: url.clone(),
            source,
        };
        let response = self.http.get(&url).query(params).send().map_err(api_err)?;
        let response = response.error_for_status().map_err(api_err)?;
        response.json().map_err(api_err)
    }
}

impl Default for IconifyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IconSource for IconifyClient {
    fn fetch_svg(&self, icon: &IconId) -> Result<String, Error> {
        self.fetch_icon_svg(icon)
    }
}

// ============================================================================
// API response types
// ============================================================================

/// Response of `GET /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    /// Matching identifiers in `prefix:name` form.
    pub icons: Vec<String>,
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub start: u32,
}

/// Response of `GET /collection?prefix=`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionInfo {
    pub prefix: String,
    pub total: u32,
    #[serde(default)]
    pub uncategorized: Vec<String>,
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub hidden: Vec<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl CollectionInfo {
    /// Flattens uncategorized icons plus every category into a
    /// deduplicated list of identifiers, in listing order.
    pub fn icon_ids(&self) -> Vec<IconId> {
        let mut seen = std::collections::BTreeSet::new();
        let mut ids = Vec::new();
        let names = self
            .uncategorized
            .iter()
            .chain(self.categories.values().flatten());
        for name in names {
            if seen.insert(name.as_str()) {
                ids.push(IconId::from_parts(&self.prefix, name));
            }
        }
        ids
    }
}

/// One entry of the `GET /collections` catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub author: Option<CollectionAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionAuthor {
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_search_results() {
        let json = r#"{
            "icons": ["mdi:home", "mdi:account"],
            "total": 2,
            "limit": 64,
            "start": 0,
            "collections": {"mdi": {"name": "Material Design Icons"}}
        }"#;
        let results: SearchResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.icons.len(), 2);
        assert_eq!(results.total, 2);
        assert_eq!(results.limit, 64);
    }

    #[test]
    fn collection_icon_ids_flatten_and_dedupe() {
        let json = r#"{
            "prefix": "mdi",
            "total": 3,
            "uncategorized": ["home"],
            "categories": {
                "Account": ["account", "home"],
                "Places": ["city"]
            }
        }"#;
        let info: CollectionInfo = serde_json::from_str(json).unwrap();
        let ids: Vec<String> = info.icon_ids().iter().map(ToString::to_string).collect();
        assert_eq!(ids, ["mdi:home", "mdi:account", "mdi:city"]);
    }

    #[test]
    fn collection_without_categories_deserializes() {
        let info: CollectionInfo =
            serde_json::from_str(r#"{"prefix": "logos", "total": 0}"#).unwrap();
        assert!(info.icon_ids().is_empty());
    }

    #[test]
    fn deserialize_collections_catalog() {
        let json = r#"{
            "mdi": {"name": "Material Design Icons", "total": 7000,
                    "author": {"name": "Pictogrammers"}},
            "logos": {"name": "SVG Logos"}
        }"#;
        let catalog: BTreeMap<String, CollectionSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(catalog["mdi"].total, Some(7000));
        assert_eq!(catalog["mdi"].author.as_ref().unwrap().name, "Pictogrammers");
        assert_eq!(catalog["logos"].total, None);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = IconifyClient::with_base_url("http://localhost:9000/");
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
