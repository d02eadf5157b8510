//! Async HTTP client for the Google Books API.

use std::time::Duration;

use nook_core::item::CatalogItem;
use reqwest::{Client, Url};
use tracing::debug;

use crate::{
  search::{RemoteSearch, SearchRequest},
  wire::{decode_volume, decode_volumes},
  Error, Result,
};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// Connection settings for the Google Books API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: String,
  /// Sent as `key=` when present; the API works without one at a lower
  /// quota.
  pub api_key:  Option<String>,
  pub timeout:  Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_owned(),
      api_key:  None,
      timeout:  Duration::from_secs(30),
    }
  }
}

/// Async HTTP client for the Google Books `volumes` endpoints.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GoogleBooksClient {
  client: Client,
  config: ClientConfig,
  base:   Url,
}

impl GoogleBooksClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let base = Url::parse(config.base_url.trim_end_matches('/'))
      .ok()
      .filter(|url| !url.cannot_be_a_base())
      .ok_or_else(|| Error::BaseUrl(config.base_url.clone()))?;
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config, base })
  }

  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  async fn fetch(&self, url: Url, params: &[(&str, String)]) -> Result<String> {
    let mut req = self.client.get(url.clone()).query(params);
    if let Some(key) = &self.config.api_key {
      req = req.query(&[("key", key)]);
    }

    let resp = req.send().await?;
    if !resp.status().is_success() {
      return Err(Error::Status { url: url.to_string(), status: resp.status() });
    }
    Ok(resp.text().await?)
  }

  /// `GET /volumes/{id}`
  pub async fn volume(&self, id: &str) -> Result<CatalogItem> {
    let body = self.fetch(self.url(&["volumes", id]), &[]).await?;
    decode_volume(&body)
  }
}

impl RemoteSearch for GoogleBooksClient {
  type Error = Error;

  /// `GET /volumes?q=<query>&startIndex=<offset>&maxResults=<limit>[&filters]`
  async fn query(&self, request: &SearchRequest) -> Result<Vec<CatalogItem>> {
    let mut params = vec![
      ("q", request.query.clone()),
      ("startIndex", request.offset.to_string()),
      ("maxResults", request.limit.to_string()),
    ];
    let filters = &request.filters;
    if let Some(lang) = &filters.lang {
      params.push(("langRestrict", lang.clone()));
    }
    if let Some(print_type) = filters.print_type {
      params.push(("printType", print_type.as_str().to_owned()));
    }
    if let Some(order_by) = filters.order_by {
      params.push(("orderBy", order_by.as_str().to_owned()));
    }

    let body = self.fetch(self.url(&["volumes"]), &params).await?;
    let items = decode_volumes(&body)?;
    debug!(query = %request.query, offset = request.offset, found = items.len(), "volumes query");
    Ok(items)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builds_urls_under_base_path() {
    let client = GoogleBooksClient::new(ClientConfig::default()).unwrap();
    assert_eq!(
      client.url(&["volumes"]).as_str(),
      "https://www.googleapis.com/books/v1/volumes"
    );
    assert_eq!(
      client.url(&["volumes", "a/b"]).as_str(),
      "https://www.googleapis.com/books/v1/volumes/a%2Fb"
    );
  }

  #[test]
  fn trailing_slash_in_base_is_ignored() {
    let client = GoogleBooksClient::new(ClientConfig {
      base_url: "http://localhost:9000/books/v1/".into(),
      ..ClientConfig::default()
    })
    .unwrap();
    assert_eq!(client.url(&["volumes"]).as_str(), "http://localhost:9000/books/v1/volumes");
  }

  #[test]
  fn rejects_unusable_base_url() {
    let err = GoogleBooksClient::new(ClientConfig {
      base_url: "mailto:books@example.com".into(),
      ..ClientConfig::default()
    })
    .err()
    .expect("should fail");
    assert!(matches!(err, Error::BaseUrl(_)));
  }
}
