//! Concurrent per-category fetch for the home screen.
//!
//! Every category gets its own task. Results are reported to a
//! [`CategoryObserver`] in completion order, and the aggregate is reported
//! once after the last category lands. A category whose query fails (or
//! whose task dies) resolves to an empty list; it never holds up or fails
//! the others.

use std::sync::Arc;

use nook_core::item::CatalogItem;
use tokio::task::JoinSet;
use tracing::warn;

use crate::{
  queries::query_for,
  search::{RemoteSearch, SearchFilters, SearchRequest},
};

// ─── Observer ────────────────────────────────────────────────────────────────

/// Receives fetch progress. Any `FnMut(&str, &[CatalogItem])` closure is an
/// observer that ignores the aggregate signal.
pub trait CategoryObserver {
  /// Called once per category, as soon as its result is known.
  fn category_resolved(&mut self, label: &str, items: &[CatalogItem]);

  /// Called exactly once, after every category has resolved.
  fn all_resolved(&mut self, _shelf: &CategoryShelf) {}
}

impl<F> CategoryObserver for F
where
  F: FnMut(&str, &[CatalogItem]),
{
  fn category_resolved(&mut self, label: &str, items: &[CatalogItem]) { self(label, items) }
}

// ─── Shelf ───────────────────────────────────────────────────────────────────

/// Fetched items per category, in the order the categories were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryShelf {
  rows: Vec<(String, Vec<CatalogItem>)>,
}

impl CategoryShelf {
  /// Items for `label`; `None` if the label was not requested.
  pub fn get(&self, label: &str) -> Option<&[CatalogItem]> {
    self
      .rows
      .iter()
      .find(|(l, _)| l == label)
      .map(|(_, items)| items.as_slice())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &[CatalogItem])> {
    self.rows.iter().map(|(l, items)| (l.as_str(), items.as_slice()))
  }

  /// Categories that came back with at least one item; the home screen
  /// hides the rest.
  pub fn populated(&self) -> impl Iterator<Item = (&str, &[CatalogItem])> {
    self.iter().filter(|(_, items)| !items.is_empty())
  }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

pub struct CategoryAggregator<S> {
  search:    Arc<S>,
  filters:   SearchFilters,
  page_size: u32,
}

impl<S> CategoryAggregator<S>
where
  S: RemoteSearch + 'static,
{
  /// Items fetched per category.
  pub const PAGE_SIZE: u32 = 10;

  pub fn new(search: Arc<S>) -> Self {
    Self { search, filters: SearchFilters::catalog(), page_size: Self::PAGE_SIZE }
  }

  fn request_for(&self, label: &str) -> SearchRequest {
    SearchRequest {
      query:   query_for(label),
      offset:  0,
      limit:   self.page_size,
      filters: self.filters.clone(),
    }
  }

  /// Fetch every category concurrently and return the merged shelf.
  ///
  /// Returning is the aggregate completion: by then `observer` has seen
  /// one `category_resolved` per entry of `categories` and one
  /// `all_resolved`.
  pub async fn fetch_all<O>(&self, categories: &[String], observer: &mut O) -> CategoryShelf
  where
    O: CategoryObserver + ?Sized,
  {
    let mut pending = JoinSet::new();

    for (index, label) in categories.iter().enumerate() {
      let search = Arc::clone(&self.search);
      let request = self.request_for(label);
      let label = label.clone();

      pending.spawn(async move {
        let items = match search.query(&request).await {
          Ok(items) => items,
          Err(e) => {
            warn!(category = %label, "category query failed: {e}");
            Vec::new()
          }
        };
        (index, items)
      });
    }

    let mut resolved: Vec<Option<Vec<CatalogItem>>> = vec![None; categories.len()];

    while let Some(joined) = pending.join_next().await {
      match joined {
        Ok((index, items)) => {
          observer.category_resolved(&categories[index], &items);
          resolved[index] = Some(items);
        }
        Err(e) => warn!("category task died: {e}"),
      }
    }

    let rows = categories
      .iter()
      .zip(resolved)
      .map(|(label, items)| {
        let items = items.unwrap_or_else(|| {
          observer.category_resolved(label, &[]);
          Vec::new()
        });
        (label.clone(), items)
      })
      .collect();

    let shelf = CategoryShelf { rows };
    observer.all_resolved(&shelf);
    shelf
  }
}

#[cfg(test)]
mod tests {
  use std::io;

  use parking_lot::Mutex;

  use super::*;

  /// Answers every query with three items, except the ones it is told to
  /// fail or panic on.
  #[derive(Default)]
  struct FakeSearch {
    fail_on:  Vec<String>,
    panic_on: Vec<String>,
    calls:    Mutex<Vec<SearchRequest>>,
  }

  impl RemoteSearch for FakeSearch {
    type Error = io::Error;

    async fn query(&self, request: &SearchRequest) -> io::Result<Vec<CatalogItem>> {
      self.calls.lock().push(request.clone());
      if self.panic_on.contains(&request.query) {
        panic!("search backend exploded");
      }
      if self.fail_on.contains(&request.query) {
        return Err(io::Error::other("connection reset"));
      }
      Ok(
        (0..3)
          .map(|i| CatalogItem::new(format!("{}#{i}", request.query), "title"))
          .collect(),
      )
    }
  }

  #[derive(Default)]
  struct Recorder {
    resolved:      Vec<(String, usize)>,
    all_resolved:  usize,
    seen_at_final: usize,
  }

  impl CategoryObserver for Recorder {
    fn category_resolved(&mut self, label: &str, items: &[CatalogItem]) {
      self.resolved.push((label.to_owned(), items.len()));
    }

    fn all_resolved(&mut self, _shelf: &CategoryShelf) {
      self.all_resolved += 1;
      self.seen_at_final = self.resolved.len();
    }
  }

  fn labels(names: &[&str]) -> Vec<String> { names.iter().map(|n| (*n).to_owned()).collect() }

  #[tokio::test]
  async fn failed_category_resolves_empty() {
    let search = Arc::new(FakeSearch {
      fail_on: vec![query_for("Romance")],
      ..FakeSearch::default()
    });
    let aggregator = CategoryAggregator::new(Arc::clone(&search));
    let mut recorder = Recorder::default();

    let shelf = aggregator
      .fetch_all(&labels(&["Fantasy", "Romance", "Poetry"]), &mut recorder)
      .await;

    assert_eq!(recorder.all_resolved, 1);
    assert_eq!(recorder.seen_at_final, 3);
    assert_eq!(shelf.get("Fantasy").map(<[_]>::len), Some(3));
    assert_eq!(shelf.get("Romance").map(<[_]>::len), Some(0));
    assert_eq!(shelf.get("Poetry").map(<[_]>::len), Some(3));
    assert_eq!(shelf.populated().count(), 2);

    let order: Vec<_> = shelf.iter().map(|(l, _)| l).collect();
    assert_eq!(order, ["Fantasy", "Romance", "Poetry"]);
  }

  #[tokio::test]
  async fn queries_use_fixed_catalog_parameters() {
    let search = Arc::new(FakeSearch::default());
    let aggregator = CategoryAggregator::new(Arc::clone(&search));

    aggregator.fetch_all(&labels(&["Fantasy", "Poetry"]), &mut |_: &str, _: &[CatalogItem]| {}).await;

    let mut calls = search.calls.lock().clone();
    calls.sort_by(|a, b| a.query.cmp(&b.query));
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].query, "subject:Poetry");
    assert_eq!(calls[1].query, query_for("Fantasy"));
    for call in calls {
      assert_eq!(call.offset, 0);
      assert_eq!(call.limit, 10);
      assert_eq!(call.filters, SearchFilters::catalog());
    }
  }

  #[tokio::test]
  async fn panicking_category_still_completes() {
    let search = Arc::new(FakeSearch {
      panic_on: vec![query_for("Fantasy")],
      ..FakeSearch::default()
    });
    let aggregator = CategoryAggregator::new(search);
    let mut recorder = Recorder::default();

    let shelf = aggregator.fetch_all(&labels(&["Fantasy", "Romance"]), &mut recorder).await;

    assert_eq!(recorder.all_resolved, 1);
    assert!(recorder.resolved.contains(&("Fantasy".to_owned(), 0)));
    assert_eq!(shelf.get("Romance").map(<[_]>::len), Some(3));
  }

  #[tokio::test]
  async fn no_categories_completes_immediately() {
    let aggregator = CategoryAggregator::new(Arc::new(FakeSearch::default()));
    let mut recorder = Recorder::default();
    let shelf = aggregator.fetch_all(&[], &mut recorder).await;
    assert!(shelf.is_empty());
    assert_eq!(recorder.all_resolved, 1);
  }
}
