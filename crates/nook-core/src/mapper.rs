//! Conversion between [`CatalogItem`] (remote/display shape) and
//! [`SavedItem`] (persisted shape), plus cover URL normalisation.

use url::Url;

use crate::item::{CatalogItem, SavedItem};

/// Zoom values the image service serves at reduced resolution.
const LOW_ZOOM_LEVELS: [&str; 2] = ["1", "2"];

/// Highest zoom hint understood by the image service.
const MAX_ZOOM: &str = "3";

/// Build the row to persist for `item`.
///
/// `pages_read` starts at 0. Stores must not write it back on a re-save of an
/// existing id; progress only moves through `update_progress`.
pub fn to_persisted(item: &CatalogItem) -> SavedItem {
  SavedItem {
    id:             item.external_id.clone(),
    title:          item.title.clone(),
    subtitle:       item.subtitle.clone(),
    authors:        item.authors.clone(),
    published_date: item.published_date.clone(),
    description:    item.description.clone(),
    page_count:     item.page_count,
    categories:     item.categories.clone(),
    image_url:      item.image_url(),
    pages_read:     0,
  }
}

/// Rebuild a displayable [`CatalogItem`] from a persisted row.
///
/// The stored cover URL becomes the only image candidate.
pub fn to_display(item: &SavedItem) -> CatalogItem {
  CatalogItem {
    external_id:      item.id.clone(),
    title:            item.title.clone(),
    subtitle:         item.subtitle.clone(),
    authors:          item.authors.clone(),
    published_date:   item.published_date.clone(),
    description:      item.description.clone(),
    page_count:       item.page_count,
    categories:       item.categories.clone(),
    image_candidates: vec![item.image_url.clone()],
  }
}

/// Pick the best cover URL out of `candidates` (ordered lowest to highest
/// resolution) and upgrade it for display.
///
/// Candidates are tried from the highest resolution down; the first one that
/// parses as a URL wins. Returns `None` when nothing parses.
pub fn normalize_image_url(candidates: &[Option<String>]) -> Option<String> {
  candidates
    .iter()
    .rev()
    .flatten()
    .find_map(|candidate| upgrade_image_url(candidate))
}

/// Force `https` and raise a low `zoom` query parameter to the maximum.
pub fn upgrade_image_url(raw: &str) -> Option<String> {
  let mut url = Url::parse(raw.trim()).ok()?;

  if url.scheme() == "http" && url.set_scheme("https").is_err() {
    return None;
  }

  let needs_zoom = url
    .query_pairs()
    .any(|(k, v)| k == "zoom" && LOW_ZOOM_LEVELS.contains(&v.as_ref()));

  if needs_zoom {
    let pairs: Vec<(String, String)> = url
      .query_pairs()
      .map(|(k, v)| {
        let v = if k == "zoom" && LOW_ZOOM_LEVELS.contains(&v.as_ref()) {
          MAX_ZOOM.to_owned()
        } else {
          v.into_owned()
        };
        (k.into_owned(), v)
      })
      .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
  }

  Some(url.into())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn some(s: &str) -> Option<String> { Some(s.to_owned()) }

  #[test]
  fn upgrades_scheme_and_zoom() {
    let candidates = vec![some("http://x/img?zoom=1"), None];
    assert_eq!(
      normalize_image_url(&candidates).as_deref(),
      Some("https://x/img?zoom=3"),
    );
  }

  #[test]
  fn keeps_other_query_parameters_in_order() {
    let raw = "http://books.google.com/books/content?id=abc&printsec=frontcover&img=1&zoom=2&edge=curl&source=gbs_api";
    assert_eq!(
      upgrade_image_url(raw).as_deref(),
      Some(
        "https://books.google.com/books/content?id=abc&printsec=frontcover&img=1&zoom=3&edge=curl&source=gbs_api"
      ),
    );
  }

  #[test]
  fn leaves_high_zoom_untouched() {
    assert_eq!(
      upgrade_image_url("https://x/img?zoom=5").as_deref(),
      Some("https://x/img?zoom=5"),
    );
  }

  #[test]
  fn prefers_highest_resolution_candidate() {
    let candidates = vec![
      some("http://x/small?zoom=5"),
      None,
      some("http://x/large"),
      None,
    ];
    assert_eq!(
      normalize_image_url(&candidates).as_deref(),
      Some("https://x/large"),
    );
  }

  #[test]
  fn skips_candidates_that_do_not_parse() {
    let candidates = vec![some("http://x/thumb"), some("not a url")];
    assert_eq!(
      normalize_image_url(&candidates).as_deref(),
      Some("https://x/thumb"),
    );
    assert_eq!(normalize_image_url(&[some("::"), None]), None);
    assert_eq!(normalize_image_url(&[]), None);
  }

  #[test]
  fn persisted_round_trip_keeps_single_cover() {
    let mut item = CatalogItem::new("vol-9", "Piranesi");
    item.authors = vec!["Susanna Clarke".into()];
    item.page_count = 272;
    item.image_candidates = vec![some("http://x/a?zoom=1"), some("http://x/b?zoom=1")];

    let saved = to_persisted(&item);
    assert_eq!(saved.id, "vol-9");
    assert_eq!(saved.pages_read, 0);
    assert_eq!(saved.image_url.as_deref(), Some("https://x/b?zoom=3"));

    let shown = to_display(&saved);
    assert_eq!(shown.external_id, "vol-9");
    assert_eq!(shown.authors, item.authors);
    assert_eq!(shown.image_candidates, vec![some("https://x/b?zoom=3")]);
    assert_eq!(shown.image_url(), saved.image_url);
  }
}
