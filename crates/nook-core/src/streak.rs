//! Reading-streak engine.
//!
//! A streak counts consecutive calendar days with at least one progress
//! write. The engine is a pair of pure transitions over [`ReadingStats`]:
//!
//! - [`record_activity`] runs inside every progress write.
//! - [`decay_idle`] runs once at start-up and zeroes a streak whose last
//!   activity is more than a day old.
//!
//! Both work in whole calendar days; the time of day never matters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Primary key of the single stats row.
pub const STATS_KEY: &str = "global";

// ─── ReadingStats ────────────────────────────────────────────────────────────

/// Process-wide reading statistics. `max_streak >= current_streak` holds
/// after every transition in this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReadingStats {
  pub last_read_date: Option<NaiveDate>,
  pub current_streak: u32,
  pub max_streak:     u32,
}

/// Coarse view of [`ReadingStats`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakState {
  /// Nothing has ever been read.
  NoHistory,
  Active(u32),
  /// There is history, but the current streak is zero.
  Broken,
}

impl ReadingStats {
  pub fn state(&self) -> StreakState {
    match (self.last_read_date, self.current_streak) {
      (None, 0) => StreakState::NoHistory,
      (_, 0) => StreakState::Broken,
      (_, n) => StreakState::Active(n),
    }
  }
}

// ─── Transitions ─────────────────────────────────────────────────────────────

/// Streak value after a gap of more than one day.
///
/// Activity on the day the gap is noticed does not count towards the new
/// streak; the next consecutive day brings it to 1.
pub fn broken_streak() -> u32 { 0 }

/// Whole calendar days from `from` to `to` (negative if `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
  (to - from).num_days()
}

/// Apply one reading activity on `today`.
pub fn record_activity(stats: &ReadingStats, today: NaiveDate) -> ReadingStats {
  let mut next = *stats;

  next.current_streak = match stats.last_read_date {
    None => 1,
    Some(last) => match days_between(last, today) {
      0 => stats.current_streak,
      1 => stats.current_streak.saturating_add(1),
      _ => broken_streak(),
    },
  };

  next.last_read_date = Some(today);
  next.max_streak = stats.max_streak.max(next.current_streak);
  next
}

/// Start-up decay. Returns the row to write, or `None` if nothing changes.
///
/// A missing row is created zeroed. A row whose last activity is more than a
/// day before `today` has its current streak zeroed; `last_read_date` and
/// `max_streak` are left alone. A row without any activity date is forced to
/// a zero streak.
pub fn decay_idle(stats: Option<&ReadingStats>, today: NaiveDate) -> Option<ReadingStats> {
  let Some(stats) = stats else {
    return Some(ReadingStats::default());
  };

  let stale = match stats.last_read_date {
    Some(last) => days_between(last, today) > 1,
    None => true,
  };

  if stale && stats.current_streak != 0 {
    Some(ReadingStats { current_streak: 0, ..*stats })
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2025, 3, d).unwrap() }

  fn stats(last: Option<NaiveDate>, current: u32, max: u32) -> ReadingStats {
    ReadingStats { last_read_date: last, current_streak: current, max_streak: max }
  }

  #[test]
  fn first_activity_starts_streak_at_one() {
    let next = record_activity(&ReadingStats::default(), day(10));
    assert_eq!(next, stats(Some(day(10)), 1, 1));
    assert_eq!(next.state(), StreakState::Active(1));
  }

  #[test]
  fn same_day_activity_does_not_double_count() {
    let once = record_activity(&stats(Some(day(9)), 2, 2), day(10));
    let twice = record_activity(&once, day(10));
    assert_eq!(once.current_streak, 3);
    assert_eq!(twice, once);
  }

  #[test]
  fn consecutive_day_extends_streak() {
    let next = record_activity(&stats(Some(day(9)), 3, 3), day(10));
    assert_eq!(next, stats(Some(day(10)), 4, 4));

    let next = record_activity(&stats(Some(day(9)), 3, 7), day(10));
    assert_eq!(next, stats(Some(day(10)), 4, 7));
  }

  #[test]
  fn gap_resets_streak_to_zero_not_one() {
    let next = record_activity(&stats(Some(day(7)), 5, 5), day(10));
    assert_eq!(next.current_streak, 0);
    assert_eq!(next.max_streak, 5);
    assert_eq!(next.last_read_date, Some(day(10)));
    assert_eq!(next.state(), StreakState::Broken);

    // The following day picks the streak back up.
    let next = record_activity(&next, day(11));
    assert_eq!(next.current_streak, 1);
  }

  #[test]
  fn max_streak_never_below_current() {
    let mut s = ReadingStats::default();
    for d in [1, 2, 3, 3, 6, 7, 8, 9, 20] {
      s = record_activity(&s, day(d));
      assert!(s.max_streak >= s.current_streak, "{s:?}");
    }
    assert_eq!(s.max_streak, 3);
  }

  #[test]
  fn decay_creates_missing_row() {
    assert_eq!(decay_idle(None, day(10)), Some(ReadingStats::default()));
  }

  #[test]
  fn decay_zeroes_stale_streak_only() {
    let stale = stats(Some(day(7)), 4, 6);
    assert_eq!(decay_idle(Some(&stale), day(10)), Some(stats(Some(day(7)), 0, 6)));

    let yesterday = stats(Some(day(9)), 4, 6);
    assert_eq!(decay_idle(Some(&yesterday), day(10)), None);

    let already_zero = stats(Some(day(1)), 0, 6);
    assert_eq!(decay_idle(Some(&already_zero), day(10)), None);
  }

  #[test]
  fn decay_forces_zero_without_date() {
    let odd = stats(None, 2, 2);
    assert_eq!(decay_idle(Some(&odd), day(10)), Some(stats(None, 0, 2)));
    assert_eq!(decay_idle(Some(&ReadingStats::default()), day(10)), None);
  }
}
