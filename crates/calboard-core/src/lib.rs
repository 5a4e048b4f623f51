//! Event synchronization and view
//! reconciliation for the calboard
//! browser client.
//!
//! Everything here is target-independent.
//! The browser shell supplies the
//! [`fetch::EventSource`],
//! [`reconcile::ViewHost`] and
//! [`prefs::PreferenceStorage`]
//! implementations.

pub mod config;
pub mod event;
pub mod fetch;
pub mod poll;
pub mod prefs;
pub mod range;
pub mod reconcile;

pub use config::ClientConfig;
pub use event::{
  ChronoFormat,
  DisplayEvent,
  EventTime,
  EventsEnvelope,
  LocalTimeFormat,
  RawEvent
};
pub use fetch::{
  EventSource,
  FetchError,
  TransportError,
  decode_envelope
};
pub use poll::{
  PollScheduler,
  SyncSession,
  Tick,
  TickReport,
  poll_tick
};
pub use prefs::{
  PreferenceStore,
  SidebarDrag,
  SidebarWidth,
  Theme
};
pub use range::{
  VisibleRange,
  compute_range
};
pub use reconcile::{
  CalendarWidget,
  ReconcileOutcome,
  Reconciler,
  ViewHost,
  WidgetError,
  WidgetOptions
};
