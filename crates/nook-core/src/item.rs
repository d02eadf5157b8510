//! Item shapes: the remote catalog view and the persisted library row.
//!
//! A [`CatalogItem`] is what the remote catalog hands out and what the UI
//! displays. A [`SavedItem`] is the row the library store owns. The two are
//! joined solely by the external identifier; conversion lives in
//! [`crate::mapper`].

use serde::{Deserialize, Serialize};

// ─── CatalogItem ─────────────────────────────────────────────────────────────

/// Immutable book metadata as returned by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogItem {
  /// Identifier assigned by the remote source; unique per source and the
  /// only join key into the local library.
  pub external_id:      String,
  pub title:            String,
  pub subtitle:         Option<String>,
  pub authors:          Vec<String>,
  /// Free-form publication date as the source reports it (`"2021"`,
  /// `"2021-03"`, `"2021-03-04"`).
  pub published_date:   Option<String>,
  pub description:      Option<String>,
  pub page_count:       u32,
  pub categories:       Vec<String>,
  /// Cover image URLs ordered from lowest to highest resolution. Slots the
  /// source left empty are kept as `None` so positions stay meaningful.
  pub image_candidates: Vec<Option<String>>,
}

impl CatalogItem {
  /// Convenience constructor with every optional field empty.
  pub fn new(external_id: impl Into<String>, title: impl Into<String>) -> Self {
    Self {
      external_id: external_id.into(),
      title: title.into(),
      ..Self::default()
    }
  }

  /// The best cover URL for this item, normalised for display.
  ///
  /// See [`crate::mapper::normalize_image_url`].
  pub fn image_url(&self) -> Option<String> {
    crate::mapper::normalize_image_url(&self.image_candidates)
  }

  /// Authors joined for a single display line.
  pub fn author_line(&self) -> String { self.authors.join(", ") }
}

// ─── SavedItem ───────────────────────────────────────────────────────────────

/// A book persisted in the local library, keyed by the external identifier.
///
/// Fields mirror [`CatalogItem`], except that the cover is stored as a single
/// already-normalised URL, plus the reader's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
  /// Primary key; equal to [`CatalogItem::external_id`].
  pub id:             String,
  pub title:          String,
  pub subtitle:       Option<String>,
  pub authors:        Vec<String>,
  pub published_date: Option<String>,
  pub description:    Option<String>,
  pub page_count:     u32,
  pub categories:     Vec<String>,
  pub image_url:      Option<String>,
  /// Only ever written through
  /// [`LibraryStore::update_progress`](crate::store::LibraryStore::update_progress);
  /// re-saving an item leaves it untouched.
  pub pages_read:     u32,
}

impl SavedItem {
  /// Reading progress as a fraction in `0.0..=1.0`, or `None` when the page
  /// count is unknown.
  pub fn progress(&self) -> Option<f64> {
    if self.page_count == 0 {
      return None;
    }
    Some((f64::from(self.pages_read) / f64::from(self.page_count)).min(1.0))
  }
}
