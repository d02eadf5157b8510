//! Fire-and-forget facade over a [`LibraryStore`].
//!
//! UI code that wants the save button to always "just work" goes through
//! [`Library`]: store failures are logged and swallowed, and reads fall back
//! to an empty answer. Callers that need to see failures use the store
//! directly.

use std::sync::Arc;

use tracing::error;

use crate::{
  changes::Subscription,
  item::{CatalogItem, SavedItem},
  store::LibraryStore,
  streak::ReadingStats,
};

/// Cheap-to-clone handle wrapping a shared store.
#[derive(Debug)]
pub struct Library<S> {
  store: Arc<S>,
}

impl<S> Clone for Library<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: LibraryStore> Library<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// The wrapped store, for callers that want errors surfaced.
  pub fn store(&self) -> &Arc<S> { &self.store }

  pub async fn save(&self, item: CatalogItem) {
    let id = item.external_id.clone();
    if let Err(e) = self.store.save(item).await {
      error!(%id, "failed to save item: {e}");
    }
  }

  pub async fn delete(&self, id: &str) {
    if let Err(e) = self.store.delete(id.to_owned()).await {
      error!(%id, "failed to delete item: {e}");
    }
  }

  pub async fn update_progress(&self, id: &str, pages_read: u32) {
    if let Err(e) = self.store.update_progress(id.to_owned(), pages_read).await {
      error!(%id, pages_read, "failed to update progress: {e}");
    }
  }

  pub async fn reset_streak_if_needed(&self) {
    if let Err(e) = self.store.reset_streak_if_needed().await {
      error!("failed to reset streak: {e}");
    }
  }

  /// `false` when the id is absent or the store cannot be read.
  pub async fn exists(&self, id: &str) -> bool {
    self.store.exists(id.to_owned()).await.unwrap_or_else(|e| {
      error!(%id, "failed to check item: {e}");
      false
    })
  }

  pub async fn get(&self, id: &str) -> Option<SavedItem> {
    self.store.get(id.to_owned()).await.unwrap_or_else(|e| {
      error!(%id, "failed to fetch item: {e}");
      None
    })
  }

  pub async fn list_all(&self) -> Vec<SavedItem> {
    self.store.list_all().await.unwrap_or_else(|e| {
      error!("failed to list items: {e}");
      Vec::new()
    })
  }

  pub async fn current_stats(&self) -> ReadingStats {
    self.store.current_stats().await.unwrap_or_else(|e| {
      error!("failed to read stats: {e}");
      ReadingStats::default()
    })
  }

  /// Subscriptions are not swallowed: without one there is nothing to hand
  /// back.
  pub async fn subscribe(&self) -> Result<Subscription, S::Error> { self.store.subscribe().await }
}

#[cfg(test)]
mod tests {
  use std::io;

  use super::*;

  /// A store whose every operation fails.
  struct Unreadable;

  fn broken() -> io::Error { io::Error::other("disk on fire") }

  impl LibraryStore for Unreadable {
    type Error = io::Error;

    async fn save(&self, _item: CatalogItem) -> io::Result<()> { Err(broken()) }

    async fn delete(&self, _id: String) -> io::Result<()> { Err(broken()) }

    async fn update_progress(&self, _id: String, _pages: u32) -> io::Result<Option<ReadingStats>> {
      Err(broken())
    }

    async fn reset_streak_if_needed(&self) -> io::Result<ReadingStats> { Err(broken()) }

    async fn exists(&self, _id: String) -> io::Result<bool> { Err(broken()) }

    async fn get(&self, _id: String) -> io::Result<Option<SavedItem>> { Err(broken()) }

    async fn list_all(&self) -> io::Result<Vec<SavedItem>> { Err(broken()) }

    async fn current_stats(&self) -> io::Result<ReadingStats> { Err(broken()) }

    async fn subscribe(&self) -> io::Result<Subscription> { Err(broken()) }
  }

  #[tokio::test]
  async fn failures_are_swallowed() {
    let library = Library::new(Arc::new(Unreadable));

    library.save(CatalogItem::new("vol-1", "Dune")).await;
    library.update_progress("vol-1", 10).await;
    library.delete("vol-1").await;
    library.reset_streak_if_needed().await;

    assert!(!library.exists("vol-1").await);
    assert_eq!(library.get("vol-1").await, None);
    assert!(library.list_all().await.is_empty());
    assert_eq!(library.current_stats().await, ReadingStats::default());
    assert!(library.subscribe().await.is_err());
  }
}
