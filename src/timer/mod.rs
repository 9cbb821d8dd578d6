pub mod session;
pub mod ticker;
pub mod tips;

pub use session::{
    format_clock, Clock, ManualClock, SessionTimer, SystemClock, TimerSession, TimerSnapshot,
};
pub use ticker::{spawn_ticker, Ticker, TICK_PERIOD};
pub use tips::{random_tip, suggest_next_recipe};
