//! SQLite backend for the Nook library store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. That thread is also where
//! change notifications are published, which keeps batches ordered.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
pub use store::SqliteLibrary;
