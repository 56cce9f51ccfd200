//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine. It does not keep time itself:
//! the caller invokes `tick()` once per elapsed second while running.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerSettings::default());
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::TimerCompleted) when time runs out
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{transition, TimerCommand, TimerMode, TimerSettings, TimerState, TimerStatus};
use crate::events::Event;

/// Owns the [`TimerState`] and the durations it is sized from.
///
/// Every command is total: one that does not apply to the current status
/// returns `None` and leaves the state untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    settings: TimerSettings,
    state: TimerState,
}

impl TimerEngine {
    /// Create an idle work timer sized from `settings`.
    pub fn new(settings: TimerSettings) -> Self {
        let state = TimerState::new(&settings);
        Self { settings, state }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            status: self.state.status,
            remaining_secs: self.state.time_remaining,
            total_secs: self.state.total_time,
            cycle_count: self.state.cycle_count,
            completed_pomodoros: self.state.completed_pomodoros,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state.status != TimerStatus::Idle {
            return None;
        }
        self.apply(TimerCommand::Start {
            session_id: Uuid::new_v4().to_string(),
        });
        Some(Event::TimerStarted {
            session_id: self.state.current_session_id.clone().unwrap_or_default(),
            mode: self.state.mode,
            duration_secs: self.state.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state.status != TimerStatus::Running {
            return None;
        }
        self.apply(TimerCommand::Pause);
        Some(Event::TimerPaused {
            remaining_secs: self.state.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state.status != TimerStatus::Paused {
            return None;
        }
        self.apply(TimerCommand::Resume);
        Some(Event::TimerResumed {
            remaining_secs: self.state.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.apply(TimerCommand::Reset);
        Some(Event::TimerReset {
            mode: self.state.mode,
            at: Utc::now(),
        })
    }

    /// Call once per second. Returns `Some(Event::TimerCompleted)` on the
    /// tick that finishes the interval; a no-op unless running.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state.status != TimerStatus::Running {
            return None;
        }
        self.apply(TimerCommand::Tick);
        if self.state.status == TimerStatus::Completed {
            return Some(Event::TimerCompleted {
                mode: self.state.mode,
                at: Utc::now(),
            });
        }
        None
    }

    /// Abandon the running or paused interval without counting it.
    pub fn skip_session(&mut self) -> Option<Event> {
        if !matches!(self.state.status, TimerStatus::Running | TimerStatus::Paused) {
            return None;
        }
        let remaining_secs = self.state.time_remaining;
        self.apply(TimerCommand::Skip);
        Some(Event::SessionSkipped {
            mode: self.state.mode,
            remaining_secs,
            at: Utc::now(),
        })
    }

    /// Record the current interval as finished. Only work intervals move
    /// the counters.
    pub fn complete_session(&mut self) -> Option<Event> {
        self.apply(TimerCommand::CompleteSession);
        Some(Event::SessionCompleted {
            mode: self.state.mode,
            completed_pomodoros: self.state.completed_pomodoros,
            cycle_count: self.state.cycle_count,
            at: Utc::now(),
        })
    }

    /// Switch to `mode` and size the interval from its configured duration.
    ///
    /// Unconditional: callers must not invoke this mid-session.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Option<Event> {
        let from = self.state.mode;
        self.apply(TimerCommand::SwitchMode(mode));
        Some(Event::ModeSwitched {
            from,
            to: mode,
            total_secs: self.state.total_time,
            at: Utc::now(),
        })
    }

    /// Change the configured length of `mode`.
    ///
    /// An idle timer in the same mode is resized at once; otherwise the new
    /// length applies from the next switch into `mode`.
    pub fn update_duration(&mut self, mode: TimerMode, minutes: u32) -> Option<Event> {
        self.settings.set_minutes(mode, minutes);
        if self.state.mode == mode && self.state.status == TimerStatus::Idle {
            self.apply(TimerCommand::SwitchMode(mode));
        }
        Some(Event::DurationUpdated {
            mode,
            minutes,
            at: Utc::now(),
        })
    }

    pub fn update_long_break_interval(&mut self, interval: u32) {
        self.settings.long_break_interval = interval;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, command: TimerCommand) {
        let before = self.state.status;
        self.state = transition(&self.state, command, &self.settings);
        if before != self.state.status {
            tracing::debug!(
                mode = %self.state.mode,
                from = ?before,
                to = ?self.state.status,
                "timer status changed"
            );
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}
