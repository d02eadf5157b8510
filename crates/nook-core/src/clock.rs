//! Source of "today" for the streak engine.

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use parking_lot::Mutex;

/// Supplies the current calendar day.
pub trait Clock: Send + Sync {
  fn today(&self) -> NaiveDate;
}

/// The local calendar day of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate { Local::now().date_naive() }
}

/// A clock that only moves when told to. Clones share the same date.
#[derive(Debug, Clone)]
pub struct FixedClock {
  today: Arc<Mutex<NaiveDate>>,
}

impl FixedClock {
  pub fn new(today: NaiveDate) -> Self {
    Self { today: Arc::new(Mutex::new(today)) }
  }

  pub fn set(&self, today: NaiveDate) { *self.today.lock() = today; }

  /// Move the clock forward by `days` calendar days.
  pub fn advance(&self, days: u64) {
    let mut today = self.today.lock();
    if let Some(next) = today.checked_add_days(Days::new(days)) {
      *today = next;
    }
  }
}

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate { *self.today.lock() }
}
