//! Core types and trait definitions for the Nook reading library.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! SQLite backend (`nook-store-sqlite`) and the remote catalog client
//! (`nook-catalog`) both build on the types and traits defined here.

pub mod changes;
pub mod clock;
pub mod item;
pub mod library;
pub mod mapper;
pub mod store;
pub mod streak;

pub use changes::{ChangeSet, LibraryEvent, Subscription};
pub use clock::{Clock, FixedClock, SystemClock};
pub use item::{CatalogItem, SavedItem};
pub use library::Library;
pub use store::LibraryStore;
pub use streak::ReadingStats;
