use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::session::{SessionTimer, TimerSnapshot};

/// Observation cadence of the cook-along screen.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background observer calling [`SessionTimer::tick`] on a fixed period and
/// publishing each snapshot. Dropping it stops observation; the session
/// itself is unaffected.
pub struct Ticker {
    handle: JoinHandle<()>,
    rx: watch::Receiver<TimerSnapshot>,
}

impl Ticker {
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.rx.clone()
    }

    pub fn latest(&self) -> TimerSnapshot {
        *self.rx.borrow()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn spawn_ticker(timer: SessionTimer, period: Duration) -> Ticker {
    let (tx, rx) = watch::channel(timer.snapshot());
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            tx.send_replace(timer.tick());
        }
    });
    Ticker { handle, rx }
}
