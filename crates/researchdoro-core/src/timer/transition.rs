//! Mode sequencing and the auto-transition policy applied after completion.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::state::TimerMode;

/// Mode that follows a completed (or skipped) `mode`.
///
/// Work is followed by a long break every `long_break_interval` cycles and
/// by a short break otherwise. Breaks always return to work. An interval of
/// zero never schedules a long break.
pub fn next_mode(mode: TimerMode, cycle_count: u32, long_break_interval: u32) -> TimerMode {
    match mode {
        TimerMode::Work => match cycle_count.checked_rem(long_break_interval) {
            Some(0) => TimerMode::LongBreak,
            _ => TimerMode::ShortBreak,
        },
        TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Work,
    }
}

/// What happens after the timer reaches `completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoTransitionPolicy {
    #[serde(default)]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_work: bool,
    /// Delay between completion and the automatic mode switch.
    #[serde(default = "default_delay_ms", rename = "transition_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    1000
}

impl Default for AutoTransitionPolicy {
    fn default() -> Self {
        Self {
            auto_start_breaks: false,
            auto_start_work: false,
            delay_ms: default_delay_ms(),
        }
    }
}

impl AutoTransitionPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Whether a freshly switched-to `mode` starts without user action.
    pub fn should_auto_start(&self, mode: TimerMode) -> bool {
        if mode.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_work
        }
    }
}
