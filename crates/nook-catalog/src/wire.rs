//! Wire schema of the Google Books `volumes` endpoint.
//!
//! Only the fields the catalog uses are modelled; everything else in the
//! response is ignored.

use nook_core::item::CatalogItem;
use serde::Deserialize;

use crate::Result;

/// `GET /volumes?q=...`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
  #[serde(default)]
  pub total_items: u32,
  /// Omitted entirely when the query matches nothing.
  #[serde(default)]
  pub items:       Option<Vec<Volume>>,
}

/// `GET /volumes/{id}` and each entry of [`VolumesResponse::items`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
  pub id:          String,
  #[serde(default)]
  pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
  #[serde(default)]
  pub title:          String,
  pub subtitle:       Option<String>,
  #[serde(default)]
  pub authors:        Vec<String>,
  pub published_date: Option<String>,
  pub description:    Option<String>,
  #[serde(default)]
  pub page_count:     u32,
  #[serde(default)]
  pub categories:     Vec<String>,
  pub image_links:    Option<ImageLinks>,
}

/// Cover links, one per resolution the service offers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
  pub small_thumbnail: Option<String>,
  pub thumbnail:       Option<String>,
  pub small:           Option<String>,
  pub medium:          Option<String>,
  pub large:           Option<String>,
  pub extra_large:     Option<String>,
}

impl ImageLinks {
  /// Links ordered from lowest to highest resolution.
  pub fn into_candidates(self) -> Vec<Option<String>> {
    vec![
      self.small_thumbnail,
      self.thumbnail,
      self.small,
      self.medium,
      self.large,
      self.extra_large,
    ]
  }
}

impl From<Volume> for CatalogItem {
  fn from(volume: Volume) -> Self {
    let info = volume.volume_info;
    CatalogItem {
      external_id:      volume.id,
      title:            info.title,
      subtitle:         info.subtitle,
      authors:          info.authors,
      published_date:   info.published_date,
      description:      info.description,
      page_count:       info.page_count,
      categories:       info.categories,
      image_candidates: info.image_links.map(ImageLinks::into_candidates).unwrap_or_default(),
    }
  }
}

/// Decode a `volumes` search response body.
pub fn decode_volumes(body: &str) -> Result<Vec<CatalogItem>> {
  let response: VolumesResponse = serde_json::from_str(body)?;
  Ok(response.items.unwrap_or_default().into_iter().map(CatalogItem::from).collect())
}

/// Decode a single-volume response body.
pub fn decode_volume(body: &str) -> Result<CatalogItem> {
  let volume: Volume = serde_json::from_str(body)?;
  Ok(volume.into())
}

#[cfg(test)]
mod tests {
  use super::*;

  const SEARCH_BODY: &str = r#"{
    "kind": "books#volumes",
    "totalItems": 2,
    "items": [
      {
        "id": "zyTCAlFPjgYC",
        "etag": "abc",
        "volumeInfo": {
          "title": "The Google Story",
          "subtitle": "Inside the Hottest Business",
          "authors": ["David A. Vise", "Mark Malseed"],
          "publishedDate": "2005-11-15",
          "description": "Here is the story...",
          "pageCount": 207,
          "categories": ["Browsers (Computer programs)"],
          "imageLinks": {
            "smallThumbnail": "http://books.google.com/books/content?id=zyTCAlFPjgYC&printsec=frontcover&img=1&zoom=5&source=gbs_api",
            "thumbnail": "http://books.google.com/books/content?id=zyTCAlFPjgYC&printsec=frontcover&img=1&zoom=1&source=gbs_api"
          },
          "language": "en"
        }
      },
      {
        "id": "bare",
        "volumeInfo": { "title": "No Frills" }
      }
    ]
  }"#;

  #[test]
  fn decodes_search_results() {
    let items = decode_volumes(SEARCH_BODY).unwrap();
    assert_eq!(items.len(), 2);

    let first = &items[0];
    assert_eq!(first.external_id, "zyTCAlFPjgYC");
    assert_eq!(first.authors.len(), 2);
    assert_eq!(first.page_count, 207);
    assert_eq!(first.image_candidates.len(), 6);
    assert_eq!(
      first.image_url().as_deref(),
      Some(
        "https://books.google.com/books/content?id=zyTCAlFPjgYC&printsec=frontcover&img=1&zoom=3&source=gbs_api"
      ),
    );

    let bare = &items[1];
    assert!(bare.authors.is_empty());
    assert!(bare.categories.is_empty());
    assert_eq!(bare.page_count, 0);
    assert!(bare.image_candidates.is_empty());
    assert_eq!(bare.image_url(), None);
  }

  #[test]
  fn missing_items_means_no_results() {
    let items = decode_volumes(r#"{"kind":"books#volumes","totalItems":0}"#).unwrap();
    assert!(items.is_empty());
  }

  #[test]
  fn malformed_body_is_an_error() {
    assert!(decode_volumes("<html>rate limited</html>").is_err());
  }

  #[test]
  fn decodes_single_volume() {
    let item = decode_volume(r#"{"id":"v1","volumeInfo":{"title":"Solo","pageCount":12}}"#).unwrap();
    assert_eq!(item.external_id, "v1");
    assert_eq!(item.page_count, 12);
  }
}
