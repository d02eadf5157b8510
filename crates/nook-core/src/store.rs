//! The `LibraryStore` trait.
//!
//! Implemented by storage backends (e.g. `nook-store-sqlite`). The UI layer
//! and the [`Library`](crate::library::Library) facade depend on this
//! abstraction, not on a concrete backend.

use std::future::Future;

use crate::{
  changes::Subscription,
  item::{CatalogItem, SavedItem},
  streak::ReadingStats,
};

/// Durable, keyed store of saved items plus the reading-stats row.
///
/// Every write is a single transaction. Writes on the same store are
/// serialised; reads may run while a write is pending. Operations on an id
/// that is not stored are no-ops, never errors.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait LibraryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert `item`, or overwrite the stored row with the same id.
  ///
  /// Every field except `pages_read` is replaced; progress survives a
  /// re-save.
  fn save(
    &self,
    item: CatalogItem,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the row with `id`. Removing a missing id succeeds.
  fn delete(&self, id: String) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set `pages_read` for `id` and record reading activity for today, in
  /// the same transaction.
  ///
  /// Returns the updated stats, or `None` if `id` is not stored (in which
  /// case nothing is written).
  fn update_progress(
    &self,
    id: String,
    pages_read: u32,
  ) -> impl Future<Output = Result<Option<ReadingStats>, Self::Error>> + Send + '_;

  /// Apply the start-up idle decay to the stats row, creating it if absent.
  fn reset_streak_if_needed(
    &self,
  ) -> impl Future<Output = Result<ReadingStats, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn exists(&self, id: String) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<SavedItem>, Self::Error>> + Send + '_;

  /// Every saved item, in store iteration order.
  fn list_all(&self) -> impl Future<Output = Result<Vec<SavedItem>, Self::Error>> + Send + '_;

  /// Current reading stats; zeroed if no row exists yet.
  fn current_stats(&self) -> impl Future<Output = Result<ReadingStats, Self::Error>> + Send + '_;

  /// Subscribe to list changes. See [`crate::changes`].
  fn subscribe(&self) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;
}
