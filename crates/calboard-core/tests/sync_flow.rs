use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use calboard_core::{
  CalendarWidget,
  ChronoFormat,
  ClientConfig,
  DisplayEvent,
  EventSource,
  EventsEnvelope,
  FetchError,
  PollScheduler,
  ReconcileOutcome,
  Reconciler,
  SyncSession,
  TickReport,
  TransportError,
  ViewHost,
  WidgetError,
  WidgetOptions,
  decode_envelope,
  poll_tick
};
use chrono::{
  NaiveDate,
  Utc
};
use futures::channel::oneshot;
use futures::executor::block_on;

#[derive(Debug, Default)]
struct PageLog {
  widgets_created: usize,
  renders:         usize,
  options:         Vec<WidgetOptions>,
  grid:            Vec<DisplayEvent>,
  sidebar:         Vec<String>,
  redirects:       Vec<String>
}

struct FakeWidget {
  log: Rc<RefCell<PageLog>>
}

impl CalendarWidget for FakeWidget {
  fn render(&mut self) {
    self.log.borrow_mut().renders += 1;
  }

  fn remove_all_events(&mut self) {
    self.log.borrow_mut().grid.clear();
  }

  fn add_event_source(
    &mut self,
    events: &[DisplayEvent]
  ) {
    self
      .log
      .borrow_mut()
      .grid
      .extend_from_slice(events);
  }
}

struct FakePage {
  log: Rc<RefCell<PageLog>>
}

impl ViewHost for FakePage {
  type Widget = FakeWidget;

  fn create_widget(
    &mut self,
    options: &WidgetOptions
  ) -> Result<FakeWidget, WidgetError> {
    let mut log = self.log.borrow_mut();
    log.widgets_created += 1;
    log.options.push(options.clone());
    log.grid = options.events.clone();
    Ok(FakeWidget {
      log: Rc::clone(&self.log)
    })
  }

  fn replace_importants(
    &mut self,
    lines: Vec<String>
  ) {
    self.log.borrow_mut().sidebar = lines;
  }

  fn redirect(&mut self, path: &str) {
    self
      .log
      .borrow_mut()
      .redirects
      .push(path.to_string());
  }
}

type Fetched = Result<EventsEnvelope, FetchError>;

struct ScriptedSource {
  responses: RefCell<VecDeque<Fetched>>
}

impl ScriptedSource {
  fn new(bodies: &[&str]) -> Self {
    Self {
      responses: RefCell::new(
        bodies
          .iter()
          .map(|body| decode_envelope(200, body))
          .collect()
      )
    }
  }
}

impl EventSource for ScriptedSource {
  async fn fetch_events(&self) -> Fetched {
    self
      .responses
      .borrow_mut()
      .pop_front()
      .unwrap_or_else(|| {
        Err(FetchError::Transport(
          TransportError::Network(
            "script exhausted".to_string()
          )
        ))
      })
  }
}

struct ChannelSource {
  pending: RefCell<VecDeque<oneshot::Receiver<Fetched>>>
}

impl EventSource for ChannelSource {
  async fn fetch_events(&self) -> Fetched {
    let receiver = self
      .pending
      .borrow_mut()
      .pop_front()
      .expect("receiver for every fetch");
    receiver.await.unwrap_or_else(|_| {
      Err(FetchError::Transport(
        TransportError::Network(
          "sender dropped".to_string()
        )
      ))
    })
  }
}

fn today() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 6, 12)
    .expect("valid date")
}

fn session(
  log: &Rc<RefCell<PageLog>>
) -> RefCell<SyncSession<FakePage>> {
  session_with(log, &ClientConfig::default())
}

fn session_with(
  log: &Rc<RefCell<PageLog>>,
  config: &ClientConfig
) -> RefCell<SyncSession<FakePage>> {
  RefCell::new(SyncSession::new(
    PollScheduler::new(config.poll_interval()),
    Reconciler::new(
      FakePage {
        log: Rc::clone(log)
      },
      config,
      Box::new(ChronoFormat::new(Utc))
    )
  ))
}

fn applied(report: TickReport) -> ReconcileOutcome {
  match report {
    | TickReport::Applied { outcome, .. } => outcome,
    | TickReport::Stale { tick } => {
      panic!("tick {} unexpectedly stale", tick.seq())
    }
  }
}

#[test]
fn grid_and_sidebar_follow_each_fetch() {
  let log = Rc::new(RefCell::new(PageLog::default()));
  let session = session(&log);
  let source = ScriptedSource::new(&[
    r#"{"regular":[{"summary":"Sync","start":{"date":"2024-06-10"}}],"important":[]}"#,
    r#"{"regular":[],"important":[{"summary":"Deadline","start":{"dateTime":"2024-06-11T09:00:00Z"}}]}"#
  ]);

  let first = applied(block_on(poll_tick(
    &source, &session, today
  )));
  assert_eq!(
    first,
    ReconcileOutcome::Initialized {
      events:    1,
      important: 0
    }
  );
  {
    let log = log.borrow();
    assert_eq!(log.widgets_created, 1);
    assert_eq!(log.renders, 1);
    assert_eq!(log.grid.len(), 1);
    assert_eq!(log.grid[0].title, "Sync");
    assert_eq!(
      log.grid[0].start.as_deref(),
      Some("2024-06-10")
    );
    assert!(log.sidebar.is_empty());
  }

  let second = applied(block_on(poll_tick(
    &source, &session, today
  )));
  assert_eq!(
    second,
    ReconcileOutcome::Replaced {
      events:    0,
      important: 1
    }
  );
  let log = log.borrow();
  assert_eq!(log.widgets_created, 1);
  assert!(log.grid.is_empty());
  assert_eq!(log.sidebar, vec![
    "Deadline \u{2013} 6/11/2024, 9:00:00 AM"
      .to_string()
  ]);
}

#[test]
fn repeating_the_same_envelope_does_not_duplicate() {
  let log = Rc::new(RefCell::new(PageLog::default()));
  let session = session(&log);
  let body = r#"{"regular":[
    {"summary":"A","start":{"date":"2024-06-10"}},
    {"summary":"B","start":{"dateTime":"2024-06-13T15:30:00Z"}}
  ],"important":[{"summary":"A","start":{"date":"2024-06-10"}}]}"#;
  let source = ScriptedSource::new(&[body, body, body]);

  for _ in 0..3 {
    block_on(poll_tick(&source, &session, today));
  }

  let log = log.borrow();
  assert_eq!(log.widgets_created, 1);
  assert_eq!(log.grid.len(), 2);
  assert_eq!(log.sidebar.len(), 1);
}

#[test]
fn unauthenticated_envelope_redirects_once_without_touching_widget(
) {
  let log = Rc::new(RefCell::new(PageLog::default()));
  let session = session(&log);
  let source = ScriptedSource::new(&[
    r#"{"error":"unauthenticated"}"#,
    r#"{"error":"unauthenticated"}"#,
    r#"{"regular":[{"summary":"late"}],"important":[]}"#
  ]);

  let outcomes: Vec<ReconcileOutcome> = (0..3)
    .map(|_| {
      applied(block_on(poll_tick(
        &source, &session, today
      )))
    })
    .collect();

  assert_eq!(outcomes, vec![
    ReconcileOutcome::Redirected,
    ReconcileOutcome::Ignored,
    ReconcileOutcome::Ignored
  ]);
  let log = log.borrow();
  assert_eq!(log.redirects, vec!["/login".to_string()]);
  assert_eq!(log.widgets_created, 0);
  assert!(log.grid.is_empty());
  assert!(log.sidebar.is_empty());
}

#[test]
fn transport_failure_keeps_last_rendered_state() {
  let log = Rc::new(RefCell::new(PageLog::default()));
  let session = session(&log);
  let source = ScriptedSource {
    responses: RefCell::new(VecDeque::from([
      decode_envelope(
        200,
        r#"{"regular":[{"summary":"Sync","start":{"date":"2024-06-10"}}],"important":[{"summary":"Deadline"}]}"#
      ),
      decode_envelope(503, "")
    ]))
  };

  block_on(poll_tick(&source, &session, today));
  let outcome = applied(block_on(poll_tick(
    &source, &session, today
  )));

  assert_eq!(outcome, ReconcileOutcome::TransportSkipped);
  let log = log.borrow();
  assert_eq!(log.grid.len(), 1);
  assert_eq!(log.sidebar, vec![
    "Deadline \u{2013} ".to_string()
  ]);
  assert!(log.redirects.is_empty());
}

#[test]
fn late_response_from_older_tick_is_dropped() {
  let log = Rc::new(RefCell::new(PageLog::default()));
  let session = session(&log);
  let (older_tx, older_rx) = oneshot::channel();
  let (newer_tx, newer_rx) = oneshot::channel();
  let source = ChannelSource {
    pending: RefCell::new(VecDeque::from([
      older_rx, newer_rx
    ]))
  };

  let older = poll_tick(&source, &session, today);
  let newer = async {
    newer_tx
      .send(decode_envelope(
        200,
        r#"{"regular":[{"summary":"new"}],"important":[]}"#
      ))
      .expect("newer receiver alive");
    let report =
      poll_tick(&source, &session, today).await;
    older_tx
      .send(decode_envelope(
        200,
        r#"{"regular":[{"summary":"old"}],"important":[]}"#
      ))
      .expect("older receiver alive");
    report
  };

  let (older_report, newer_report) =
    block_on(async { futures::join!(older, newer) });

  assert!(matches!(
    newer_report,
    TickReport::Applied {
      outcome: ReconcileOutcome::Initialized { .. },
      ..
    }
  ));
  assert!(matches!(
    older_report,
    TickReport::Stale { .. }
  ));
  let log = log.borrow();
  assert_eq!(log.grid.len(), 1);
  assert_eq!(log.grid[0].title, "new");
}

#[test]
fn newer_transport_failure_does_not_hide_older_success(
) {
  let log = Rc::new(RefCell::new(PageLog::default()));
  let session = session(&log);
  let (older_tx, older_rx) = oneshot::channel();
  let (newer_tx, newer_rx) = oneshot::channel();
  let source = ChannelSource {
    pending: RefCell::new(VecDeque::from([
      older_rx, newer_rx
    ]))
  };

  let older = poll_tick(&source, &session, today);
  let newer = async {
    newer_tx
      .send(decode_envelope(503, ""))
      .expect("newer receiver alive");
    let report =
      poll_tick(&source, &session, today).await;
    older_tx
      .send(decode_envelope(
        200,
        r#"{"regular":[{"summary":"slow","start":{"date":"2024-06-12"}}],"important":[]}"#
      ))
      .expect("older receiver alive");
    report
  };

  let (older_report, newer_report) =
    block_on(async { futures::join!(older, newer) });

  assert!(matches!(
    newer_report,
    TickReport::Applied {
      outcome: ReconcileOutcome::TransportSkipped,
      ..
    }
  ));
  assert_eq!(
    applied(older_report),
    ReconcileOutcome::Initialized {
      events:    1,
      important: 0
    }
  );
  let log = log.borrow();
  assert_eq!(log.widgets_created, 1);
  assert_eq!(log.grid[0].title, "slow");
}

#[test]
fn configured_week_start_shapes_the_widget() {
  let log = Rc::new(RefCell::new(PageLog::default()));
  let config = ClientConfig::from_toml_str(
    "week_start = \"monday\""
  )
  .expect("parse config");
  let session = session_with(&log, &config);
  let source = ScriptedSource::new(&[
    r#"{"regular":[],"important":[]}"#,
    r#"{"regular":[],"important":[]}"#
  ]);

  block_on(poll_tick(&source, &session, today));
  let later = || {
    NaiveDate::from_ymd_opt(2024, 7, 20)
      .expect("valid date")
  };
  block_on(poll_tick(&source, &session, later));

  let log = log.borrow();
  assert_eq!(log.options.len(), 1);
  let options = &log.options[0];
  assert_eq!(options.first_day, 1);
  assert_eq!(
    options.visible_range.start,
    NaiveDate::from_ymd_opt(2024, 6, 10)
      .expect("valid date")
  );
  assert_eq!(
    options.visible_range.end,
    NaiveDate::from_ymd_opt(2024, 7, 8)
      .expect("valid date")
  );

  let json = serde_json::to_value(options)
    .expect("serialize options");
  assert_eq!(json["firstDay"], 1);
  assert_eq!(
    json["visibleRange"]["start"],
    "2024-06-10"
  );
  assert_eq!(
    session.borrow().reconciler.visible_range(),
    Some(options.visible_range)
  );
}
