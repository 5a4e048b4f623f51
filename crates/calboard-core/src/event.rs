use chrono::{
  DateTime,
  FixedOffset,
  NaiveDate,
  NaiveDateTime,
  SecondsFormat,
  TimeZone
};
use serde::{
  Deserialize,
  Serialize
};

/// Title shown for events the backend
/// sent without a summary.
pub const UNTITLED_PLACEHOLDER: &str =
  "(No Title)";

const ALL_DAY_FORMAT: &str = "%Y-%m-%d";

const WALL_CLOCK_FORMAT: &str =
  "%Y-%m-%dT%H:%M:%S%.f";

/// Wire form of an event endpoint:
/// `{ dateTime?, date? }`.
#[derive(
  Debug, Clone, Default, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct RawEventTime {
  #[serde(default)]
  pub date_time: Option<String>,
  #[serde(default)]
  pub date:      Option<String>
}

/// One endpoint of an event, decoded
/// from the wire exactly once.
///
/// `dateTime` wins over `date` when a
/// backend sends both, and anything that
/// does not parse lands in `Unknown`. A
/// `dateTime` without an offset is kept
/// as `Floating` wall-clock time in the
/// viewer's zone.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Deserialize,
)]
#[serde(from = "Option<RawEventTime>")]
pub enum EventTime {
  Timed(DateTime<FixedOffset>),
  Floating(NaiveDateTime),
  AllDay(NaiveDate),
  #[default]
  Unknown
}

impl From<Option<RawEventTime>>
  for EventTime
{
  fn from(
    raw: Option<RawEventTime>
  ) -> Self {
    let Some(raw) = raw else {
      return Self::Unknown;
    };

    if let Some(value) = non_blank(
      raw.date_time.as_deref()
    ) {
      if let Ok(instant) =
        DateTime::parse_from_rfc3339(value)
      {
        return Self::Timed(instant);
      }
      match NaiveDateTime::parse_from_str(
        value,
        WALL_CLOCK_FORMAT
      ) {
        | Ok(local) => {
          return Self::Floating(local);
        }
        | Err(error) => {
          tracing::debug!(
            %error,
            value,
            "ignoring unparseable \
             event dateTime"
          );
        }
      }
    }

    if let Some(value) =
      non_blank(raw.date.as_deref())
    {
      match NaiveDate::parse_from_str(
        value,
        ALL_DAY_FORMAT
      ) {
        | Ok(date) => {
          return Self::AllDay(date);
        }
        | Err(error) => {
          tracing::debug!(
            %error,
            value,
            "ignoring unparseable \
             event date"
          );
        }
      }
    }

    Self::Unknown
  }
}

fn non_blank(
  value: Option<&str>
) -> Option<&str> {
  value
    .map(str::trim)
    .filter(|value| !value.is_empty())
}

impl EventTime {
  /// The string handed to the calendar
  /// widget. All-day dates keep their
  /// `YYYY-MM-DD` form so the widget
  /// lays them out as whole days.
  pub fn widget_value(
    &self
  ) -> Option<String> {
    match self {
      | Self::Timed(instant) => Some(
        instant.to_rfc3339_opts(
          SecondsFormat::AutoSi,
          true
        )
      ),
      | Self::Floating(local) => Some(
        local
          .format(WALL_CLOCK_FORMAT)
          .to_string()
      ),
      | Self::AllDay(date) => Some(
        date
          .format(ALL_DAY_FORMAT)
          .to_string()
      ),
      | Self::Unknown => None
    }
  }
}

/// Event record sent by the backend.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Deserialize,
)]
pub struct RawEvent {
  #[serde(default)]
  pub summary: Option<String>,
  #[serde(default)]
  pub start:   EventTime,
  #[serde(default)]
  pub end:     EventTime
}

impl RawEvent {
  pub fn title(&self) -> &str {
    match self.summary.as_deref() {
      | Some(summary)
        if !summary.is_empty() =>
      {
        summary
      }
      | _ => UNTITLED_PLACEHOLDER
    }
  }
}

/// Normalized record consumed by the
/// calendar widget.
#[derive(
  Debug, Clone, PartialEq, Eq, Serialize,
)]
pub struct DisplayEvent {
  pub title: String,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub start: Option<String>,
  #[serde(
    skip_serializing_if = "Option::is_none"
  )]
  pub end:   Option<String>
}

impl From<&RawEvent> for DisplayEvent {
  fn from(event: &RawEvent) -> Self {
    Self {
      title: event.title().to_string(),
      start: event.start.widget_value(),
      end:   event.end.widget_value()
    }
  }
}

/// Successful payload of one fetch.
///
/// `regular` feeds the grid and
/// `important` feeds the sidebar; the
/// two lists are independent.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct EventsEnvelope {
  pub regular:   Vec<RawEvent>,
  pub important: Vec<RawEvent>
}

impl EventsEnvelope {
  pub fn display_events(
    &self
  ) -> Vec<DisplayEvent> {
    self
      .regular
      .iter()
      .map(DisplayEvent::from)
      .collect()
  }

  pub fn important_lines(
    &self,
    format: &dyn LocalTimeFormat
  ) -> Vec<String> {
    self
      .important
      .iter()
      .map(|event| {
        important_line(event, format)
      })
      .collect()
  }
}

/// Renders instants for humans in the
/// viewer's local time.
pub trait LocalTimeFormat {
  fn format_instant(
    &self,
    instant: &DateTime<FixedOffset>
  ) -> String;

  /// Wall-clock time that carries no
  /// offset.
  fn format_wall_clock(
    &self,
    local: &NaiveDateTime
  ) -> String;

  fn format_date(
    &self,
    date: NaiveDate
  ) -> String;
}

const LOCALE_INSTANT_FORMAT: &str =
  "%-m/%-d/%Y, %-I:%M:%S %p";

/// `LocalTimeFormat` backed by a chrono
/// time zone, rendering en-US style
/// `6/11/2024, 9:00:00 AM`.
#[derive(Debug, Clone)]
pub struct ChronoFormat<Tz> {
  timezone: Tz
}

impl<Tz: TimeZone> ChronoFormat<Tz> {
  pub fn new(timezone: Tz) -> Self {
    Self { timezone }
  }
}

impl<Tz> LocalTimeFormat
  for ChronoFormat<Tz>
where
  Tz: TimeZone,
  Tz::Offset: std::fmt::Display
{
  fn format_instant(
    &self,
    instant: &DateTime<FixedOffset>
  ) -> String {
    instant
      .with_timezone(&self.timezone)
      .format(LOCALE_INSTANT_FORMAT)
      .to_string()
  }

  fn format_wall_clock(
    &self,
    local: &NaiveDateTime
  ) -> String {
    local.format(LOCALE_INSTANT_FORMAT).to_string()
  }

  fn format_date(
    &self,
    date: NaiveDate
  ) -> String {
    date.format("%-m/%-d/%Y").to_string()
  }
}

/// Sidebar line for an important event:
/// `"<title> – <local time>"`, with an
/// empty time when the start is unknown.
pub fn important_line(
  event: &RawEvent,
  format: &dyn LocalTimeFormat
) -> String {
  let when = match &event.start {
    | EventTime::Timed(instant) => {
      format.format_instant(instant)
    }
    | EventTime::Floating(local) => {
      format.format_wall_clock(local)
    }
    | EventTime::AllDay(date) => {
      format.format_date(*date)
    }
    | EventTime::Unknown => String::new()
  };

  format!("{} \u{2013} {when}", event.title())
}
