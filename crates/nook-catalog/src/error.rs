//! Error type for `nook-catalog`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("GET {url} → {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },

  #[error("invalid base url: {0:?}")]
  BaseUrl(String),

  #[error("failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
