mod controller;
mod engine;
mod state;
mod transition;

pub use controller::{ControllerError, TimerController, TimerHandle};
pub use engine::TimerEngine;
pub use state::{transition, TimerCommand, TimerMode, TimerSettings, TimerState, TimerStatus};
pub use transition::{next_mode, AutoTransitionPolicy};
