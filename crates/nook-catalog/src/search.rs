//! The `RemoteSearch` trait and its request types.

use std::future::Future;

use nook_core::item::CatalogItem;

// ─── Filters ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintType {
  All,
  Books,
  Magazines,
}

impl PrintType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::All => "all",
      Self::Books => "books",
      Self::Magazines => "magazines",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
  Relevance,
  Newest,
}

impl OrderBy {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Relevance => "relevance",
      Self::Newest => "newest",
    }
  }
}

/// Result filters applied to every query. `None` leaves the source default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
  /// ISO 639-1 language restriction.
  pub lang:       Option<String>,
  pub print_type: Option<PrintType>,
  pub order_by:   Option<OrderBy>,
}

impl SearchFilters {
  /// English-language books, newest first. Used by every catalog view.
  pub fn catalog() -> Self {
    Self {
      lang:       Some("en".into()),
      print_type: Some(PrintType::Books),
      order_by:   Some(OrderBy::Newest),
    }
  }
}

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
  /// Source query string, e.g. `subject:fantasy (magic OR dragons)`.
  pub query:   String,
  pub offset:  u32,
  pub limit:   u32,
  pub filters: SearchFilters,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A remote source of catalog items.
pub trait RemoteSearch: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run one query and decode the results into [`CatalogItem`]s.
  fn query<'a>(
    &'a self,
    request: &'a SearchRequest,
  ) -> impl Future<Output = Result<Vec<CatalogItem>, Self::Error>> + Send + 'a;
}
