//! On-demand paging through a single category.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use nook_core::item::CatalogItem;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
  queries::query_for,
  search::{RemoteSearch, SearchFilters, SearchRequest},
};

/// Outcome of [`Paginator::load_more`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
  /// A page was requested. Holds the items it added, which may be none if
  /// the query failed or the category is exhausted.
  Appended(Vec<CatalogItem>),
  /// Another load was already in flight; nothing was requested.
  Skipped,
}

#[derive(Debug, Default)]
struct PageState {
  offset: u32,
  items:  Vec<CatalogItem>,
}

/// Clears the in-flight flag when the load finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
  fn drop(&mut self) { self.0.store(false, Ordering::Release); }
}

pub struct Paginator<S> {
  search:    Arc<S>,
  subject:   String,
  query:     String,
  filters:   SearchFilters,
  page_size: u32,
  in_flight: AtomicBool,
  state:     Mutex<PageState>,
}

impl<S: RemoteSearch> Paginator<S> {
  /// Items requested per page.
  pub const PAGE_SIZE: u32 = 20;

  pub fn new(search: Arc<S>, subject: impl Into<String>) -> Self {
    let subject = subject.into();
    Self {
      search,
      query: query_for(&subject),
      subject,
      filters: SearchFilters::catalog(),
      page_size: Self::PAGE_SIZE,
      in_flight: AtomicBool::new(false),
      state: Mutex::new(PageState::default()),
    }
  }

  pub fn subject(&self) -> &str { &self.subject }

  /// Request the next page and append it.
  ///
  /// At most one load runs at a time; a call made while another is in
  /// flight returns [`PageLoad::Skipped`] without querying. The cursor
  /// advances by a full page whenever a query is issued, whatever it
  /// returned.
  pub async fn load_more(&self) -> PageLoad {
    if self
      .in_flight
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      debug!(subject = %self.subject, "load already in flight");
      return PageLoad::Skipped;
    }
    let _guard = InFlight(&self.in_flight);

    let offset = self.state.lock().offset;
    let request = SearchRequest {
      query: self.query.clone(),
      offset,
      limit: self.page_size,
      filters: self.filters.clone(),
    };

    let page = match self.search.query(&request).await {
      Ok(items) => items,
      Err(e) => {
        warn!(subject = %self.subject, offset, "page query failed: {e}");
        Vec::new()
      }
    };

    let mut state = self.state.lock();
    state.offset = offset + self.page_size;
    state.items.extend(page.iter().cloned());
    debug!(subject = %self.subject, offset = state.offset, total = state.items.len(), "page loaded");

    PageLoad::Appended(page)
  }

  pub fn is_loading(&self) -> bool { self.in_flight.load(Ordering::Acquire) }

  /// Offset of the next page to be requested.
  pub fn offset(&self) -> u32 { self.state.lock().offset }

  /// Everything loaded so far, in page order.
  pub fn items(&self) -> Vec<CatalogItem> { self.state.lock().items.clone() }
}
