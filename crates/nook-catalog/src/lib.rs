//! Remote catalog access for Nook.
//!
//! - [`search::RemoteSearch`] is the seam to the external search API;
//!   [`google::GoogleBooksClient`] implements it over HTTP.
//! - [`aggregator::CategoryAggregator`] fans one query per category out
//!   concurrently and reports each category as it lands.
//! - [`paginator::Paginator`] pages through a single category on demand.
//!
//! Remote failures never escape these types as errors: a failed query is
//! logged and treated as an empty result.

pub mod aggregator;
pub mod error;
pub mod google;
pub mod paginator;
pub mod queries;
pub mod search;
pub mod wire;

pub use aggregator::{CategoryAggregator, CategoryObserver, CategoryShelf};
pub use error::{Error, Result};
pub use google::{ClientConfig, GoogleBooksClient};
pub use paginator::{PageLoad, Paginator};
pub use search::{OrderBy, PrintType, RemoteSearch, SearchFilters, SearchRequest};
