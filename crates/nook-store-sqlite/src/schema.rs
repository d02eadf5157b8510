//! SQL schema and migrations for the Nook SQLite store.
//!
//! The schema version lives in `PRAGMA user_version`. Each entry of
//! [`MIGRATIONS`] moves the database one version forward; opening a store
//! applies whatever is missing inside a single transaction.

use rusqlite::Connection;

/// Connection-level settings, applied on every open.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
";

/// `MIGRATIONS[n]` upgrades a database from version `n` to `n + 1`.
pub const MIGRATIONS: &[&str] = &[
  // v1: saved items, before reading progress existed.
  "
  CREATE TABLE IF NOT EXISTS saved_items (
      id             TEXT PRIMARY KEY,
      title          TEXT NOT NULL,
      subtitle       TEXT,
      authors        TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
      published_date TEXT,
      description    TEXT,
      page_count     INTEGER NOT NULL DEFAULT 0,
      categories     TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
      image_url      TEXT
  );
  ",
  // v2: per-item progress (existing rows back-filled with 0) and the
  // single-row streak table.
  "
  ALTER TABLE saved_items ADD COLUMN pages_read INTEGER NOT NULL DEFAULT 0;

  CREATE TABLE IF NOT EXISTS reading_stats (
      id             TEXT PRIMARY KEY,             -- always 'global'
      last_read_date TEXT,                         -- YYYY-MM-DD
      current_streak INTEGER NOT NULL DEFAULT 0,
      max_streak     INTEGER NOT NULL DEFAULT 0
  );
  ",
];

/// Version a fully migrated database reports.
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

/// Bring `conn` up to [`SCHEMA_VERSION`]. Returns the version found on disk.
///
/// A database newer than this crate is left untouched; the caller decides
/// what to do with it.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<i64> {
  conn.execute_batch(PRAGMAS)?;

  let tx = conn.transaction()?;
  let found: i64 = tx.pragma_query_value(None, "user_version", |row| row.get(0))?;

  if found < SCHEMA_VERSION {
    for step in MIGRATIONS.iter().skip(found.max(0) as usize) {
      tx.execute_batch(step)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
  }

  tx.commit()?;
  Ok(found)
}
