//! Plain-text rendering of library and catalog data for the terminal.

use std::fmt::Write as _;

use nook_catalog::{CategoryObserver, CategoryShelf};
use nook_core::{
  changes::LibraryEvent,
  item::{CatalogItem, SavedItem},
  streak::{ReadingStats, StreakState},
};

/// One line per catalog item: `id  title: subtitle (authors)`.
pub fn catalog_line(item: &CatalogItem) -> String {
  let mut line = format!("{:<14} {}", item.external_id, item.title);
  if let Some(subtitle) = &item.subtitle {
    let _ = write!(line, ": {subtitle}");
  }
  if !item.authors.is_empty() {
    let _ = write!(line, " ({})", item.author_line());
  }
  line
}

/// `pages_read/page_count (NN%)`, or just the pages read when the page
/// count is unknown.
pub fn progress_label(item: &SavedItem) -> String {
  match item.progress() {
    Some(fraction) => {
      format!("{}/{} ({:.0}%)", item.pages_read, item.page_count, fraction * 100.0)
    }
    None => format!("{} pages read", item.pages_read),
  }
}

pub fn saved_line(item: &SavedItem) -> String {
  format!("{:<14} {}  [{}]", item.id, item.title, progress_label(item))
}

pub fn saved_details(item: &SavedItem) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", item.title);
  if let Some(subtitle) = &item.subtitle {
    let _ = writeln!(out, "  {subtitle}");
  }
  if !item.authors.is_empty() {
    let _ = writeln!(out, "by {}", item.authors.join(", "));
  }
  let _ = writeln!(out, "id:        {}", item.id);
  if let Some(date) = &item.published_date {
    let _ = writeln!(out, "published: {date}");
  }
  if !item.categories.is_empty() {
    let _ = writeln!(out, "subjects:  {}", item.categories.join(", "));
  }
  if let Some(url) = &item.image_url {
    let _ = writeln!(out, "cover:     {url}");
  }
  let _ = writeln!(out, "progress:  {}", progress_label(item));
  if let Some(description) = &item.description {
    let _ = writeln!(out, "\n{description}");
  }
  out
}

pub fn stats(stats: &ReadingStats) -> String {
  let streak = match stats.state() {
    StreakState::NoHistory => "no reading recorded yet".to_owned(),
    StreakState::Broken => "streak broken".to_owned(),
    StreakState::Active(1) => "1 day".to_owned(),
    StreakState::Active(n) => format!("{n} days"),
  };
  let last = stats
    .last_read_date
    .map_or_else(|| "never".to_owned(), |d| d.format("%Y-%m-%d").to_string());
  format!("current streak: {streak}\nlongest streak: {}\nlast read:      {last}", stats.max_streak)
}

/// Describe one change-feed event. Deleted rows are gone from the new list,
/// so only their old positions can be shown.
pub fn event(event: &LibraryEvent) -> String {
  match event {
    LibraryEvent::Initial(items) => format!("library has {} item(s)", items.len()),
    LibraryEvent::Update { items, changes } => {
      let mut out = String::new();
      for index in &changes.deletions {
        let _ = writeln!(out, "- removed row {index}");
      }
      for index in &changes.insertions {
        if let Some(item) = items.get(*index) {
          let _ = writeln!(out, "+ {}", saved_line(item));
        }
      }
      for index in &changes.modifications {
        if let Some(item) = items.get(*index) {
          let _ = writeln!(out, "~ {}", saved_line(item));
        }
      }
      let _ = write!(out, "library has {} item(s)", items.len());
      out
    }
  }
}

// ─── Shelf printer ───────────────────────────────────────────────────────────

/// Prints each category as soon as it resolves. Empty categories are not
/// shown.
#[derive(Debug, Default)]
pub struct ShelfPrinter {
  shown: usize,
}

impl CategoryObserver for ShelfPrinter {
  fn category_resolved(&mut self, label: &str, items: &[CatalogItem]) {
    if items.is_empty() {
      return;
    }
    self.shown += 1;
    println!("── {label} ──");
    for item in items {
      println!("  {}", catalog_line(item));
    }
    println!();
  }

  fn all_resolved(&mut self, shelf: &CategoryShelf) {
    println!("{} of {} categories returned results", self.shown, shelf.len());
  }
}

#[cfg(test)]
mod tests {
  use nook_core::{changes::ChangeSet, mapper::to_persisted};

  use super::*;

  fn dune() -> CatalogItem {
    let mut item = CatalogItem::new("vol-1", "Dune");
    item.authors = vec!["Frank Herbert".into()];
    item.page_count = 400;
    item
  }

  #[test]
  fn catalog_line_includes_authors() {
    let line = catalog_line(&dune());
    assert!(line.starts_with("vol-1"));
    assert!(line.ends_with("Dune (Frank Herbert)"));
  }

  #[test]
  fn progress_label_handles_unknown_page_count() {
    let mut saved = to_persisted(&dune());
    saved.pages_read = 100;
    assert_eq!(progress_label(&saved), "100/400 (25%)");

    saved.page_count = 0;
    assert_eq!(progress_label(&saved), "100 pages read");
  }

  #[test]
  fn stats_show_state() {
    assert!(stats(&ReadingStats::default()).contains("no reading recorded yet"));

    let active = ReadingStats { last_read_date: None, current_streak: 3, max_streak: 5 };
    let text = stats(&active);
    assert!(text.contains("3 days"));
    assert!(text.contains("longest streak: 5"));
  }

  #[test]
  fn update_events_list_changed_rows() {
    let items = vec![to_persisted(&dune())];
    let text = event(&LibraryEvent::Update { items, changes: ChangeSet::inserted(0) });
    assert!(text.starts_with("+ vol-1"));
    assert!(text.ends_with("library has 1 item(s)"));
  }
}
