use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerStatus};

/// Every timer state change produces an Event.
/// The CLI prints them; controller subscribers receive them over broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        session_id: String,
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero.
    TimerCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    /// Counters updated for a finished interval.
    SessionCompleted {
        mode: TimerMode,
        completed_pomodoros: u64,
        cycle_count: u32,
        at: DateTime<Utc>,
    },
    SessionSkipped {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    DurationUpdated {
        mode: TimerMode,
        minutes: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        status: TimerStatus,
        remaining_secs: u64,
        total_secs: u64,
        cycle_count: u32,
        completed_pomodoros: u64,
        at: DateTime<Utc>,
    },
}

