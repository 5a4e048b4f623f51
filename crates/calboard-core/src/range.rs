use chrono::{
  Datelike,
  Days,
  NaiveDate,
  Weekday
};
use serde::Serialize;

/// The grid always shows four full weeks.
pub const VISIBLE_DAYS: u64 = 28;

/// Date window shown by the grid,
/// exclusive at `end`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct VisibleRange {
  pub start: NaiveDate,
  pub end:   NaiveDate
}

impl VisibleRange {
  pub fn contains(
    &self,
    day: NaiveDate
  ) -> bool {
    day >= self.start && day < self.end
  }

  pub fn len_days(&self) -> i64 {
    (self.end - self.start).num_days()
  }
}

/// Anchors the window at the most recent
/// `week_start` on or before `today` and
/// extends it by [`VISIBLE_DAYS`].
///
/// `today` is the only notion of "now";
/// the result depends on nothing else.
pub fn compute_range(
  today: NaiveDate,
  week_start: Weekday
) -> VisibleRange {
  let start =
    start_of_week(today, week_start);
  let end = start
    .checked_add_days(Days::new(
      VISIBLE_DAYS
    ))
    .unwrap_or(NaiveDate::MAX);

  VisibleRange { start, end }
}

pub fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let day_idx = day
    .weekday()
    .num_days_from_sunday();
  let start_idx =
    week_start.num_days_from_sunday();
  let diff = (7 + day_idx - start_idx) % 7;

  day
    .checked_sub_days(Days::new(u64::from(
      diff
    )))
    .unwrap_or(day)
}

/// Sunday-based index the widget expects
/// for its first day column.
pub fn first_day_index(
  week_start: Weekday
) -> u32 {
  week_start.num_days_from_sunday()
}
