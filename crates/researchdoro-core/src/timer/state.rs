//! Timer state record and the pure transition function.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running -> Completed (tick reaches 0, skip, completeSession)
//! any -> Idle (reset, switchMode)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Work)
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerMode::Work => write!(f, "work"),
            TimerMode::ShortBreak => write!(f, "shortBreak"),
            TimerMode::LongBreak => write!(f, "longBreak"),
        }
    }
}

impl std::str::FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "work" | "focus" => Ok(TimerMode::Work),
            "shortbreak" | "short" => Ok(TimerMode::ShortBreak),
            "longbreak" | "long" => Ok(TimerMode::LongBreak),
            other => Err(format!("unknown timer mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Per-mode durations in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Completed work sessions between long breaks.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

fn default_work_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
        }
    }
}

impl TimerSettings {
    pub fn minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        }
    }

    pub fn set_minutes(&mut self, mode: TimerMode, minutes: u32) {
        match mode {
            TimerMode::Work => self.work_minutes = minutes,
            TimerMode::ShortBreak => self.short_break_minutes = minutes,
            TimerMode::LongBreak => self.long_break_minutes = minutes,
        }
    }

    /// Duration of `mode` in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes(mode)).saturating_mul(60)
    }
}

/// The single active timer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: TimerMode,
    pub status: TimerStatus,
    /// Seconds left in the current interval. Never exceeds `total_time`.
    pub time_remaining: u64,
    /// Length of the current interval in seconds.
    pub total_time: u64,
    /// Completed work sessions, drives the short/long break decision.
    pub cycle_count: u32,
    pub completed_pomodoros: u64,
    #[serde(default)]
    pub current_session_id: Option<String>,
}

impl TimerState {
    /// Idle work interval sized from `settings`.
    pub fn new(settings: &TimerSettings) -> Self {
        let total = settings.duration_secs(TimerMode::Work);
        Self {
            mode: TimerMode::Work,
            status: TimerStatus::Idle,
            time_remaining: total,
            total_time: total,
            cycle_count: 0,
            completed_pomodoros: 0,
            current_session_id: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(&TimerSettings::default())
    }
}

/// Inputs to [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start from idle. `session_id` is used only when none is assigned.
    Start { session_id: String },
    Pause,
    Resume,
    Reset,
    Tick,
    Skip,
    SwitchMode(TimerMode),
    CompleteSession,
}

/// Apply `command` to `state`, returning the next state.
///
/// Total over every (state, command) pair: commands that do not apply to
/// the current status return the state unchanged.
pub fn transition(state: &TimerState, command: TimerCommand, settings: &TimerSettings) -> TimerState {
    let mut next = state.clone();
    match command {
        TimerCommand::Start { session_id } => {
            if state.status == TimerStatus::Idle {
                next.status = TimerStatus::Running;
                if next.current_session_id.is_none() {
                    next.current_session_id = Some(session_id);
                }
            }
        }
        TimerCommand::Pause => {
            if state.status == TimerStatus::Running {
                next.status = TimerStatus::Paused;
            }
        }
        TimerCommand::Resume => {
            if state.status == TimerStatus::Paused {
                next.status = TimerStatus::Running;
            }
        }
        TimerCommand::Tick => {
            if state.status == TimerStatus::Running {
                next.time_remaining = state.time_remaining.saturating_sub(1);
                if next.time_remaining == 0 {
                    next.status = TimerStatus::Completed;
                }
            }
        }
        TimerCommand::Reset => {
            next.status = TimerStatus::Idle;
            next.current_session_id = None;
            next.time_remaining = state.total_time;
        }
        TimerCommand::Skip => {
            if matches!(state.status, TimerStatus::Running | TimerStatus::Paused) {
                next.status = TimerStatus::Completed;
                next.current_session_id = None;
            }
        }
        TimerCommand::SwitchMode(mode) => {
            let total = settings.duration_secs(mode);
            next.mode = mode;
            next.status = TimerStatus::Idle;
            next.total_time = total;
            next.time_remaining = total;
        }
        TimerCommand::CompleteSession => {
            if state.mode == TimerMode::Work {
                next.completed_pomodoros = state.completed_pomodoros.saturating_add(1);
                next.cycle_count = state.cycle_count.saturating_add(1);
            }
            next.status = TimerStatus::Completed;
            next.current_session_id = None;
        }
    }
    next
}
