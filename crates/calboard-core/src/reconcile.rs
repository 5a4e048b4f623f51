use chrono::{
  NaiveDate,
  Weekday
};
use serde::Serialize;
use thiserror::Error;
use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::config::ClientConfig;
use crate::event::{
  DisplayEvent,
  EventsEnvelope,
  LocalTimeFormat
};
use crate::fetch::FetchError;
use crate::range::{
  VisibleRange,
  compute_range,
  first_day_index
};

pub const INITIAL_VIEW: &str = "dayGrid";

#[derive(
  Debug, Clone, PartialEq, Eq, Serialize,
)]
pub struct HeaderToolbar {
  pub left:   &'static str,
  pub center: &'static str,
  pub right:  &'static str
}

impl Default for HeaderToolbar {
  fn default() -> Self {
    Self {
      left:   "",
      center: "title",
      right:  ""
    }
  }
}

/// Construction options for the calendar
/// widget, serialized in the shape the
/// widget reads.
#[derive(
  Debug, Clone, PartialEq, Eq, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
  pub initial_view:     &'static str,
  pub visible_range:    VisibleRange,
  pub first_day:        u32,
  pub header_toolbar:   HeaderToolbar,
  pub events:           Vec<DisplayEvent>,
  pub height:           &'static str,
  pub fixed_week_count: bool
}

impl WidgetOptions {
  pub fn new(
    visible_range: VisibleRange,
    week_start: Weekday,
    events: Vec<DisplayEvent>
  ) -> Self {
    Self {
      initial_view: INITIAL_VIEW,
      visible_range,
      first_day: first_day_index(
        week_start
      ),
      header_toolbar: HeaderToolbar::default(),
      events,
      height: "100%",
      fixed_week_count: false
    }
  }
}

#[derive(Debug, Clone, Error)]
#[error("calendar widget unavailable: {0}")]
pub struct WidgetError(pub String);

/// The live calendar renderer.
pub trait CalendarWidget {
  fn render(&mut self);

  fn remove_all_events(&mut self);

  fn add_event_source(
    &mut self,
    events: &[DisplayEvent]
  );
}

/// Everything the reconciler drives on
/// the page: widget construction, the
/// important-events list, and navigation.
pub trait ViewHost {
  type Widget: CalendarWidget;

  fn create_widget(
    &mut self,
    options: &WidgetOptions
  ) -> Result<Self::Widget, WidgetError>;

  /// Replaces the whole important list.
  fn replace_importants(
    &mut self,
    lines: Vec<String>
  );

  /// Full-page navigation.
  fn redirect(&mut self, path: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
  Initialized {
    events:    usize,
    important: usize
  },
  Replaced {
    events:    usize,
    important: usize
  },
  /// The widget could not be built; only
  /// the sidebar was updated.
  WidgetUnavailable { important: usize },
  Redirected,
  TransportSkipped,
  /// A redirect already happened.
  Ignored
}

enum ViewState<W> {
  Uninitialized,
  Live {
    widget: W,
    range:  VisibleRange
  },
  Redirected
}

/// Owns the page's single calendar
/// widget and applies each fetch result
/// to it.
///
/// The widget is built on the first
/// successful fetch and lives until the
/// reconciler is dropped. Later fetches
/// swap its events in place so the
/// widget keeps its own navigation state.
pub struct Reconciler<H: ViewHost> {
  host:       H,
  state:      ViewState<H::Widget>,
  week_start: Weekday,
  login_path: String,
  format:     Box<dyn LocalTimeFormat>
}

impl<H: ViewHost> Reconciler<H> {
  pub fn new(
    host: H,
    config: &ClientConfig,
    format: Box<dyn LocalTimeFormat>
  ) -> Self {
    Self {
      host,
      state: ViewState::Uninitialized,
      week_start: config.week_start_day(),
      login_path: config.login_path.clone(),
      format
    }
  }

  pub fn host(&self) -> &H {
    &self.host
  }

  pub fn is_live(&self) -> bool {
    matches!(
      self.state,
      ViewState::Live { .. }
    )
  }

  pub fn is_redirected(&self) -> bool {
    matches!(
      self.state,
      ViewState::Redirected
    )
  }

  /// Window frozen at widget creation.
  pub fn visible_range(
    &self
  ) -> Option<VisibleRange> {
    match &self.state {
      | ViewState::Live { range, .. } => {
        Some(*range)
      }
      | _ => None
    }
  }

  /// `today` is only read when the widget
  /// is built.
  pub fn apply(
    &mut self,
    fetched: Result<
      EventsEnvelope,
      FetchError
    >,
    today: NaiveDate
  ) -> ReconcileOutcome {
    if self.is_redirected() {
      debug!(
        "ignoring fetch result after \
         redirect"
      );
      return ReconcileOutcome::Ignored;
    }

    match fetched {
      | Err(FetchError::Unauthenticated {
        reason
      }) => {
        info!(
          %reason,
          login_path = %self.login_path,
          "session rejected; redirecting \
           to login"
        );
        self.state = ViewState::Redirected;
        self.host.redirect(&self.login_path);
        ReconcileOutcome::Redirected
      }
      | Err(FetchError::Transport(err)) => {
        warn!(
          error = %err,
          "events fetch failed; keeping \
           last rendered view"
        );
        ReconcileOutcome::TransportSkipped
      }
      | Ok(envelope) => {
        self.apply_envelope(&envelope, today)
      }
    }
  }

  fn apply_envelope(
    &mut self,
    envelope: &EventsEnvelope,
    today: NaiveDate
  ) -> ReconcileOutcome {
    let events = envelope.display_events();
    let event_count = events.len();
    let important = envelope.important.len();

    let (state, outcome) = match std::mem::replace(
      &mut self.state,
      ViewState::Uninitialized
    ) {
      | ViewState::Live {
        mut widget,
        range
      } => {
        widget.remove_all_events();
        widget.add_event_source(&events);
        debug!(
          events = event_count,
          "replaced calendar events"
        );
        (
          ViewState::Live { widget, range },
          ReconcileOutcome::Replaced {
            events: event_count,
            important
          }
        )
      }
      | ViewState::Uninitialized => {
        let range =
          compute_range(today, self.week_start);
        let options = WidgetOptions::new(
          range,
          self.week_start,
          events
        );
        match self.host.create_widget(&options)
        {
          | Ok(mut widget) => {
            widget.render();
            info!(
              start = %range.start,
              end = %range.end,
              events = event_count,
              "calendar widget initialized"
            );
            (
              ViewState::Live { widget, range },
              ReconcileOutcome::Initialized {
                events: event_count,
                important
              }
            )
          }
          | Err(err) => {
            error!(
              error = %err,
              "calendar widget construction \
               failed; retrying next tick"
            );
            (
              ViewState::Uninitialized,
              ReconcileOutcome::WidgetUnavailable {
                important
              }
            )
          }
        }
      }
      | ViewState::Redirected => {
        (
          ViewState::Redirected,
          ReconcileOutcome::Ignored
        )
      }
    };
    self.state = state;

    if outcome != ReconcileOutcome::Ignored {
      self.host.replace_importants(
        envelope
          .important_lines(self.format.as_ref())
      );
    }

    outcome
  }
}
