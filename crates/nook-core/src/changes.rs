//! Change notification for the saved-item list.
//!
//! A [`Subscription`] first yields [`LibraryEvent::Initial`] with the full
//! list, then one [`LibraryEvent::Update`] per committed write that changed
//! the list. Each update carries the list as it stands after the write plus
//! the [`ChangeSet`] that turns the previous list into it.
//!
//! Stores publish through a [`ChangeFeed`] from a single thread, so every
//! subscriber sees the same batches in the same order.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::item::SavedItem;

// ─── ChangeSet ───────────────────────────────────────────────────────────────

/// Index sets describing one batch of list changes.
///
/// `deletions` index the list before the batch; `insertions` and
/// `modifications` index the list after it. Each set is sorted and free of
/// duplicates, and no row appears in more than one set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
  pub deletions:     Vec<usize>,
  pub insertions:    Vec<usize>,
  pub modifications: Vec<usize>,
}

impl ChangeSet {
  pub fn inserted(index: usize) -> Self {
    Self { insertions: vec![index], ..Self::default() }
  }

  pub fn deleted(index: usize) -> Self {
    Self { deletions: vec![index], ..Self::default() }
  }

  pub fn modified(index: usize) -> Self {
    Self { modifications: vec![index], ..Self::default() }
  }

  pub fn is_empty(&self) -> bool {
    self.deletions.is_empty() && self.insertions.is_empty() && self.modifications.is_empty()
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
  /// Full snapshot; delivered exactly once, as the first event.
  Initial(Vec<SavedItem>),
  Update {
    items:   Vec<SavedItem>,
    changes: ChangeSet,
  },
}

impl LibraryEvent {
  /// The list as it stands after this event.
  pub fn items(&self) -> &[SavedItem] {
    match self {
      Self::Initial(items) | Self::Update { items, .. } => items,
    }
  }
}

// ─── Subscription ────────────────────────────────────────────────────────────

/// Receiving end of a change feed. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
  rx: mpsc::UnboundedReceiver<LibraryEvent>,
}

impl Subscription {
  /// Wait for the next event. Returns `None` once the store has shut down.
  pub async fn next(&mut self) -> Option<LibraryEvent> { self.rx.recv().await }

  /// Take the next event if one is already queued.
  pub fn try_next(&mut self) -> Option<LibraryEvent> { self.rx.try_recv().ok() }

  pub fn unsubscribe(self) {}
}

// ─── ChangeFeed ──────────────────────────────────────────────────────────────

/// Publishing side shared by store handles. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct ChangeFeed {
  subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<LibraryEvent>>>>,
}

impl ChangeFeed {
  pub fn new() -> Self { Self::default() }

  /// Register a subscriber whose first event is `snapshot`.
  ///
  /// Callers must take the snapshot and call this without letting a publish
  /// slip in between, otherwise the first update would be applied twice.
  pub fn subscribe(&self, snapshot: Vec<SavedItem>) -> Subscription {
    let (tx, rx) = mpsc::unbounded_channel();
    // A fresh channel cannot be closed yet.
    let _ = tx.send(LibraryEvent::Initial(snapshot));
    self.subscribers.lock().push(tx);
    Subscription { rx }
  }

  /// Deliver one batch to every live subscriber, pruning dropped ones.
  /// Empty change sets are not delivered.
  pub fn publish(&self, items: Vec<SavedItem>, changes: ChangeSet) {
    if changes.is_empty() {
      return;
    }
    let mut subscribers = self.subscribers.lock();
    subscribers.retain(|tx| {
      tx.send(LibraryEvent::Update { items: items.clone(), changes: changes.clone() })
        .is_ok()
    });
  }

  pub fn has_subscribers(&self) -> bool {
    let mut subscribers = self.subscribers.lock();
    subscribers.retain(|tx| !tx.is_closed());
    !subscribers.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{item::CatalogItem, mapper::to_persisted};

  fn saved(id: &str) -> SavedItem { to_persisted(&CatalogItem::new(id, id)) }

  #[tokio::test]
  async fn initial_snapshot_then_updates() {
    let feed = ChangeFeed::new();
    let mut sub = feed.subscribe(vec![saved("a")]);

    feed.publish(vec![saved("a"), saved("b")], ChangeSet::inserted(1));

    assert_eq!(sub.next().await, Some(LibraryEvent::Initial(vec![saved("a")])));
    let update = sub.next().await.unwrap();
    assert_eq!(update.items().len(), 2);
    assert!(matches!(update, LibraryEvent::Update { ref changes, .. } if changes.insertions == [1]));
    assert!(sub.try_next().is_none());
  }

  #[tokio::test]
  async fn empty_batches_are_not_delivered() {
    let feed = ChangeFeed::new();
    let mut sub = feed.subscribe(Vec::new());
    feed.publish(Vec::new(), ChangeSet::default());

    assert!(matches!(sub.next().await, Some(LibraryEvent::Initial(_))));
    assert!(sub.try_next().is_none());
  }

  #[test]
  fn dropped_subscribers_are_pruned() {
    let feed = ChangeFeed::new();
    let sub = feed.subscribe(Vec::new());
    assert!(feed.has_subscribers());
    sub.unsubscribe();
    assert!(!feed.has_subscribers());
  }
}
