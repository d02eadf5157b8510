//! Error type for `nook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The file was written by a newer version of this crate.
  #[error("unsupported schema version {found} (newest known is {supported})")]
  UnsupportedSchema { found: i64, supported: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
