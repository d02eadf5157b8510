//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! String lists (authors, categories) are stored as compact JSON arrays.
//! Counters are plain integers; dates go through rusqlite's chrono support
//! as `YYYY-MM-DD` text.

use nook_core::{item::SavedItem, streak::ReadingStats};
use rusqlite::{Connection, OptionalExtension as _, Row};

use crate::Result;

// ─── Lists ───────────────────────────────────────────────────────────────────

pub fn encode_list(values: &[String]) -> Result<String> {
  Ok(serde_json::to_string(values)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Saved items ─────────────────────────────────────────────────────────────

/// Column list shared by every `saved_items` SELECT, in [`RawSavedItem`]
/// field order.
pub const ITEM_COLUMNS: &str = "id, title, subtitle, authors, published_date, description,
   page_count, categories, image_url, pages_read";

/// A `saved_items` row with list columns still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSavedItem {
  pub id:             String,
  pub title:          String,
  pub subtitle:       Option<String>,
  pub authors:        String,
  pub published_date: Option<String>,
  pub description:    Option<String>,
  pub page_count:     u32,
  pub categories:     String,
  pub image_url:      Option<String>,
  pub pages_read:     u32,
}

impl RawSavedItem {
  pub fn encode(item: &SavedItem) -> Result<Self> {
    Ok(Self {
      id:             item.id.clone(),
      title:          item.title.clone(),
      subtitle:       item.subtitle.clone(),
      authors:        encode_list(&item.authors)?,
      published_date: item.published_date.clone(),
      description:    item.description.clone(),
      page_count:     item.page_count,
      categories:     encode_list(&item.categories)?,
      image_url:      item.image_url.clone(),
      pages_read:     item.pages_read,
    })
  }

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      title:          row.get(1)?,
      subtitle:       row.get(2)?,
      authors:        row.get(3)?,
      published_date: row.get(4)?,
      description:    row.get(5)?,
      page_count:     row.get(6)?,
      categories:     row.get(7)?,
      image_url:      row.get(8)?,
      pages_read:     row.get(9)?,
    })
  }

  /// Equal in every column a save writes, i.e. ignoring `pages_read`.
  pub fn same_metadata(&self, other: &Self) -> bool {
    Self { pages_read: 0, ..self.clone() } == Self { pages_read: 0, ..other.clone() }
  }

  pub fn into_saved(self) -> Result<SavedItem> {
    Ok(SavedItem {
      id:             self.id,
      title:          self.title,
      subtitle:       self.subtitle,
      authors:        decode_list(&self.authors)?,
      published_date: self.published_date,
      description:    self.description,
      page_count:     self.page_count,
      categories:     decode_list(&self.categories)?,
      image_url:      self.image_url,
      pages_read:     self.pages_read,
    })
  }
}

pub fn load_raw_item(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawSavedItem>> {
  conn
    .query_row(
      &format!("SELECT {ITEM_COLUMNS} FROM saved_items WHERE id = ?1"),
      rusqlite::params![id],
      RawSavedItem::from_row,
    )
    .optional()
}

/// Every row in iteration order (insertion order; an upsert keeps its slot).
pub fn load_raw_items(conn: &Connection) -> rusqlite::Result<Vec<RawSavedItem>> {
  let mut stmt =
    conn.prepare_cached(&format!("SELECT {ITEM_COLUMNS} FROM saved_items ORDER BY rowid"))?;
  stmt
    .query_map([], RawSavedItem::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()
}

pub fn decode_items(raws: Vec<RawSavedItem>) -> Result<Vec<SavedItem>> {
  raws.into_iter().map(RawSavedItem::into_saved).collect()
}

/// Position of `id` in [`load_raw_items`] order, or `None` if absent.
pub fn row_index(conn: &Connection, id: &str) -> rusqlite::Result<Option<usize>> {
  let index: Option<i64> = conn
    .query_row(
      "SELECT (SELECT COUNT(*) FROM saved_items WHERE rowid < s.rowid)
       FROM saved_items s WHERE s.id = ?1",
      rusqlite::params![id],
      |row| row.get(0),
    )
    .optional()?;
  Ok(index.map(|i| i as usize))
}

// ─── Reading stats ───────────────────────────────────────────────────────────

pub fn load_stats(conn: &Connection) -> rusqlite::Result<Option<ReadingStats>> {
  conn
    .query_row(
      "SELECT last_read_date, current_streak, max_streak FROM reading_stats WHERE id = ?1",
      rusqlite::params![nook_core::streak::STATS_KEY],
      |row| {
        Ok(ReadingStats {
          last_read_date: row.get(0)?,
          current_streak: row.get(1)?,
          max_streak:     row.get(2)?,
        })
      },
    )
    .optional()
}

pub fn store_stats(conn: &Connection, stats: &ReadingStats) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO reading_stats (id, last_read_date, current_streak, max_streak)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(id) DO UPDATE SET
       last_read_date = excluded.last_read_date,
       current_streak = excluded.current_streak,
       max_streak     = excluded.max_streak",
    rusqlite::params![
      nook_core::streak::STATS_KEY,
      stats.last_read_date,
      stats.current_streak,
      stats.max_streak,
    ],
  )?;
  Ok(())
}
