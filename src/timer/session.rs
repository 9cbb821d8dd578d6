use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::tips::random_tip;

/// Upper bound on a single start/extend, in minutes (one year).
const MAX_MINUTES: i64 = 60 * 24 * 365;

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Raw countdown state. Idle is `running == false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSession {
    pub end: Option<OffsetDateTime>,
    pub running: bool,
}

/// What observers see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub running: bool,
    pub remaining_secs: u64,
    /// Remaining seconds at the last `start`; the baseline for `progress`.
    pub total_secs: u64,
}

impl TimerSnapshot {
    /// Elapsed fraction since the last `start`, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        let left = self.remaining_secs.min(self.total_secs) as f64 / self.total_secs as f64;
        1.0 - left
    }

    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// `m:ss`; minutes are not wrapped into hours.
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Default)]
struct Inner {
    session: TimerSession,
    total_secs: u64,
    tip: Option<&'static str>,
}

/// Handle to the single cook-along countdown. Clones share the same session,
/// so a screen that goes away and comes back picks up where it left off.
#[derive(Clone)]
pub struct SessionTimer {
    inner: Arc<Mutex<Inner>>,
    clock: Arc<dyn Clock>,
}

impl SessionTimer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            clock,
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a countdown, or extend the running one by `minutes`.
    ///
    /// While running the minutes are added to the existing end, not to now.
    /// The end is never placed before now, so zero or negative input just
    /// yields a countdown that is already over.
    pub fn start(&self, minutes: i64) -> TimerSnapshot {
        let now = self.clock.now();
        let mut inner = self.lock();
        let base = match inner.session {
            TimerSession {
                running: true,
                end: Some(end),
            } => end,
            _ => now,
        };
        let end = base
            .checked_add(Duration::minutes(minutes.clamp(-MAX_MINUTES, MAX_MINUTES)))
            .unwrap_or(base)
            .max(now);
        inner.session = TimerSession {
            end: Some(end),
            running: true,
        };
        inner.total_secs = remaining_secs(end, now);
        inner.tip = Some(random_tip());
        debug!(minutes, remaining_secs = inner.total_secs, "timer started");
        snapshot_of(&inner, now)
    }

    /// Back to idle from any state.
    pub fn reset(&self) {
        *self.lock() = Inner::default();
        debug!("timer reset");
    }

    /// Observe the countdown. When it has run out the session drops to idle
    /// on its own; the end timestamp itself is left as it was.
    pub fn tick(&self) -> TimerSnapshot {
        let now = self.clock.now();
        let mut inner = self.lock();
        let snap = snapshot_of(&inner, now);
        if inner.session.running && snap.remaining_secs == 0 {
            inner.session.running = false;
            debug!("timer finished");
            return TimerSnapshot {
                running: false,
                ..snap
            };
        }
        snap
    }

    /// Read-only view; never transitions.
    pub fn snapshot(&self) -> TimerSnapshot {
        let now = self.clock.now();
        snapshot_of(&self.lock(), now)
    }

    pub fn session(&self) -> TimerSession {
        self.lock().session
    }

    /// Tip picked at the last `start`.
    pub fn tip(&self) -> Option<&'static str> {
        self.lock().tip
    }
}

fn snapshot_of(inner: &Inner, now: OffsetDateTime) -> TimerSnapshot {
    let remaining = match inner.session {
        TimerSession {
            running: true,
            end: Some(end),
        } => remaining_secs(end, now),
        _ => 0,
    };
    TimerSnapshot {
        running: inner.session.running,
        remaining_secs: remaining,
        total_secs: inner.total_secs,
    }
}

/// `max(ceil((end - now) / 1s), 0)`.
fn remaining_secs(end: OffsetDateTime, now: OffsetDateTime) -> u64 {
    let millis = (end - now).whole_milliseconds();
    if millis <= 0 {
        0
    } else {
        u64::try_from((millis + 999) / 1000).unwrap_or(u64::MAX)
    }
}
