//! [`SqliteLibrary`], the SQLite implementation of [`LibraryStore`].

use std::{path::Path, sync::Arc};

use nook_core::{
  changes::{ChangeFeed, ChangeSet, Subscription},
  clock::{Clock, SystemClock},
  item::{CatalogItem, SavedItem},
  mapper::to_persisted,
  store::LibraryStore,
  streak::{self, ReadingStats},
};
use rusqlite::{Connection, OptionalExtension as _};
use tracing::{debug, error, info};

use crate::{
  encode::{
    decode_items, load_raw_item, load_raw_items, load_stats, row_index, store_stats,
    RawSavedItem,
  },
  schema::{self, SCHEMA_VERSION},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Nook library backed by a single SQLite file.
///
/// Cloning is cheap; clones share the connection, the change feed and the
/// clock. Every call runs on the connection's worker thread one at a time,
/// which is what serialises writes.
#[derive(Clone)]
pub struct SqliteLibrary {
  conn:  tokio_rusqlite::Connection,
  feed:  ChangeFeed,
  clock: Arc<dyn Clock>,
}

impl SqliteLibrary {
  /// Open (or create) a library at `path`, migrating it if needed.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with_clock(path, Arc::new(SystemClock)).await
  }

  /// Like [`open`](Self::open), reading "today" from `clock`.
  pub async fn open_with_clock(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, clock).await
  }

  /// Open an in-memory library, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_in_memory_with_clock(Arc::new(SystemClock)).await
  }

  pub async fn open_in_memory_with_clock(clock: Arc<dyn Clock>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, clock).await
  }

  async fn init(conn: tokio_rusqlite::Connection, clock: Arc<dyn Clock>) -> Result<Self> {
    let found = conn.call(|conn| Ok(schema::migrate(conn)?)).await?;

    if found > SCHEMA_VERSION {
      return Err(Error::UnsupportedSchema { found, supported: SCHEMA_VERSION });
    }
    if found < SCHEMA_VERSION {
      info!(from = found, to = SCHEMA_VERSION, "migrated library schema");
    }

    Ok(Self { conn, feed: ChangeFeed::new(), clock })
  }

  /// Shut the connection down. Other clones of this handle start failing
  /// with a closed-connection error.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── Helpers (run on the connection thread) ──────────────────────────────────

/// Insert a row or overwrite everything but `pages_read`.
fn upsert_item(conn: &Connection, raw: &RawSavedItem) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO saved_items (
       id, title, subtitle, authors, published_date, description,
       page_count, categories, image_url
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
     ON CONFLICT(id) DO UPDATE SET
       title          = excluded.title,
       subtitle       = excluded.subtitle,
       authors        = excluded.authors,
       published_date = excluded.published_date,
       description    = excluded.description,
       page_count     = excluded.page_count,
       categories     = excluded.categories,
       image_url      = excluded.image_url",
    rusqlite::params![
      raw.id,
      raw.title,
      raw.subtitle,
      raw.authors,
      raw.published_date,
      raw.description,
      raw.page_count,
      raw.categories,
      raw.image_url,
    ],
  )?;
  Ok(())
}

/// Send `changes` to subscribers together with the committed list.
///
/// Must be called after the transaction commits and before the closure
/// returns, so no other write can land in between.
fn publish(feed: &ChangeFeed, conn: &Connection, changes: ChangeSet) {
  if changes.is_empty() || !feed.has_subscribers() {
    return;
  }
  match load_raw_items(conn).map_err(Error::from).and_then(decode_items) {
    Ok(items) => feed.publish(items, changes),
    Err(e) => error!("failed to snapshot library for subscribers: {e}"),
  }
}

fn other(e: Error) -> tokio_rusqlite::Error { tokio_rusqlite::Error::Other(Box::new(e)) }

// ─── LibraryStore impl ───────────────────────────────────────────────────────

impl LibraryStore for SqliteLibrary {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn save(&self, item: CatalogItem) -> Result<()> {
    let raw = RawSavedItem::encode(&to_persisted(&item))?;
    let feed = self.feed.clone();

    let changes = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let changes = match load_raw_item(&tx, &raw.id)? {
          Some(existing) if existing.same_metadata(&raw) => ChangeSet::default(),
          Some(_) => {
            let index = row_index(&tx, &raw.id)?;
            upsert_item(&tx, &raw)?;
            index.map(ChangeSet::modified).unwrap_or_default()
          }
          None => {
            let len: i64 = tx.query_row("SELECT COUNT(*) FROM saved_items", [], |r| r.get(0))?;
            upsert_item(&tx, &raw)?;
            ChangeSet::inserted(len as usize)
          }
        };

        tx.commit()?;
        publish(&feed, conn, changes.clone());
        Ok(changes)
      })
      .await?;

    debug!(id = %item.external_id, ?changes, "saved item");
    Ok(())
  }

  async fn delete(&self, id: String) -> Result<()> {
    let feed = self.feed.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(index) = row_index(&tx, &id)? else {
          return Ok(());
        };
        tx.execute("DELETE FROM saved_items WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        publish(&feed, conn, ChangeSet::deleted(index));
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn update_progress(&self, id: String, pages_read: u32) -> Result<Option<ReadingStats>> {
    let today = self.clock.today();
    let feed = self.feed.clone();

    let stats = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(index) = row_index(&tx, &id)? else {
          return Ok(None);
        };

        let previous: u32 = tx.query_row(
          "SELECT pages_read FROM saved_items WHERE id = ?1",
          rusqlite::params![id],
          |row| row.get(0),
        )?;
        tx.execute(
          "UPDATE saved_items SET pages_read = ?2 WHERE id = ?1",
          rusqlite::params![id, pages_read],
        )?;

        // The streak moves in the same transaction as the progress.
        let stats = streak::record_activity(&load_stats(&tx)?.unwrap_or_default(), today);
        store_stats(&tx, &stats)?;
        tx.commit()?;

        if previous != pages_read {
          publish(&feed, conn, ChangeSet::modified(index));
        }
        Ok(Some(stats))
      })
      .await?;

    if let Some(stats) = &stats {
      debug!(pages_read, streak = stats.current_streak, "recorded progress");
    }
    Ok(stats)
  }

  async fn reset_streak_if_needed(&self) -> Result<ReadingStats> {
    let today = self.clock.today();

    let (stats, changed) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current = load_stats(&tx)?;
        let result = match streak::decay_idle(current.as_ref(), today) {
          Some(next) => {
            store_stats(&tx, &next)?;
            (next, true)
          }
          None => (current.unwrap_or_default(), false),
        };
        tx.commit()?;
        Ok(result)
      })
      .await?;

    if changed {
      info!(max_streak = stats.max_streak, "reading streak reset");
    }
    Ok(stats)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn exists(&self, id: String) -> Result<bool> {
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM saved_items WHERE id = ?1",
              rusqlite::params![id],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
        )
      })
      .await?;
    Ok(found)
  }

  async fn get(&self, id: String) -> Result<Option<SavedItem>> {
    let raw = self.conn.call(move |conn| Ok(load_raw_item(conn, &id)?)).await?;
    raw.map(RawSavedItem::into_saved).transpose()
  }

  async fn list_all(&self) -> Result<Vec<SavedItem>> {
    let raws = self.conn.call(|conn| Ok(load_raw_items(conn)?)).await?;
    decode_items(raws)
  }

  async fn current_stats(&self) -> Result<ReadingStats> {
    let stats = self.conn.call(|conn| Ok(load_stats(conn)?)).await?;
    Ok(stats.unwrap_or_default())
  }

  async fn subscribe(&self) -> Result<Subscription> {
    let feed = self.feed.clone();

    // Snapshot and registration happen in one call so no write can slip in
    // between them.
    let subscription = self
      .conn
      .call(move |conn| {
        let items = decode_items(load_raw_items(conn)?).map_err(other)?;
        Ok(feed.subscribe(items))
      })
      .await?;
    Ok(subscription)
  }
}
