use std::cell::RefCell;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::debug;

use crate::fetch::EventSource;
use crate::reconcile::{
  ReconcileOutcome,
  Reconciler,
  ViewHost
};

/// Sequence number handed to a tick when
/// its fetch starts.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
)]
pub struct Tick(u64);

impl Tick {
  pub fn seq(self) -> u64 {
    self.0
  }
}

/// Fixed-period tick source with a
/// stale-response guard.
///
/// Ticks are never awaited or cancelled,
/// so fetches may overlap. A completed
/// fetch is applied only when no newer
/// tick has been applied already, so the
/// view never regresses to older data.
/// Transport failures apply nothing and
/// leave the watermark where it was.
#[derive(Debug, Clone)]
pub struct PollScheduler {
  period:  Duration,
  issued:  u64,
  applied: Option<u64>
}

impl PollScheduler {
  pub fn new(period: Duration) -> Self {
    Self {
      period,
      issued: 0,
      applied: None
    }
  }

  /// Period in whole milliseconds,
  /// saturating for timer APIs that take
  /// `u32`.
  pub fn period_millis(&self) -> u32 {
    u32::try_from(self.period.as_millis())
      .unwrap_or(u32::MAX)
  }

  pub fn begin_tick(&mut self) -> Tick {
    let tick = Tick(self.issued);
    self.issued += 1;
    tick
  }

  /// Whether a result at least as new as
  /// `tick`'s has already been applied.
  pub fn is_stale(&self, tick: Tick) -> bool {
    self
      .applied
      .is_some_and(|newest| tick.0 <= newest)
  }

  /// Records that `tick`'s result reached
  /// the view.
  pub fn mark_applied(&mut self, tick: Tick) {
    if !self.is_stale(tick) {
      self.applied = Some(tick.0);
    }
  }

  pub fn ticks_issued(&self) -> u64 {
    self.issued
  }
}

/// The scheduler and reconciler for one
/// page session.
pub struct SyncSession<H: ViewHost> {
  pub scheduler:  PollScheduler,
  pub reconciler: Reconciler<H>
}

impl<H: ViewHost> SyncSession<H> {
  pub fn new(
    scheduler: PollScheduler,
    reconciler: Reconciler<H>
  ) -> Self {
    Self {
      scheduler,
      reconciler
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickReport {
  Applied {
    tick:    Tick,
    outcome: ReconcileOutcome
  },
  Stale { tick: Tick }
}

/// Runs one tick: fetch, then reconcile.
///
/// The session is only borrowed before
/// and after the fetch, never across it,
/// so overlapping ticks on one thread are
/// fine. `today` is read once the fetch
/// has completed.
pub async fn poll_tick<S, H>(
  source: &S,
  session: &RefCell<SyncSession<H>>,
  today: impl FnOnce() -> NaiveDate
) -> TickReport
where
  S: EventSource,
  H: ViewHost
{
  let tick =
    session.borrow_mut().scheduler.begin_tick();
  debug!(tick = tick.seq(), "poll tick started");

  let fetched = source.fetch_events().await;

  let mut session = session.borrow_mut();
  if session.scheduler.is_stale(tick) {
    debug!(
      tick = tick.seq(),
      "dropping stale fetch result"
    );
    return TickReport::Stale { tick };
  }

  let outcome =
    session.reconciler.apply(fetched, today());
  if outcome != ReconcileOutcome::TransportSkipped {
    session.scheduler.mark_applied(tick);
  }
  debug!(
    tick = tick.seq(),
    ?outcome,
    "poll tick applied"
  );
  TickReport::Applied { tick, outcome }
}
