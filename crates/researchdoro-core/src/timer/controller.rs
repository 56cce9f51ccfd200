//! Single-owner driver for a [`TimerEngine`].
//!
//! One tokio task owns the engine. It runs the 1 Hz tick source only while
//! the timer is running and applies the auto-transition policy once per
//! completion. Handles talk to it over channels:
//!
//! - commands: `mpsc`
//! - state: `watch` (latest [`TimerState`])
//! - events: `broadcast`

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior, Sleep};

use super::engine::TimerEngine;
use super::state::{TimerMode, TimerState, TimerStatus};
use super::transition::{next_mode, AutoTransitionPolicy};
use crate::events::Event;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Mode switches are refused while a session is running.
    #[error("cannot switch mode while a session is running")]
    SessionRunning,

    /// The controller task has exited.
    #[error("timer controller has stopped")]
    Stopped,
}

#[derive(Debug, Clone)]
enum Command {
    Start,
    Pause,
    Resume,
    Reset,
    Skip,
    SwitchMode(TimerMode),
    UpdateDuration { mode: TimerMode, minutes: u32 },
}

/// What the run loop must do with its timers after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Followup {
    Nothing,
    ScheduleTransition,
    CancelTransition,
}

/// Cloneable handle to a running controller.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<TimerState>,
    events: broadcast::Sender<Event>,
}

impl TimerHandle {
    /// Latest published state.
    pub fn state(&self) -> TimerState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn watch(&self) -> watch::Receiver<TimerState> {
        self.state.clone()
    }

    /// Subscribe to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn start(&self) -> Result<(), ControllerError> {
        self.send(Command::Start).await
    }

    pub async fn pause(&self) -> Result<(), ControllerError> {
        self.send(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<(), ControllerError> {
        self.send(Command::Resume).await
    }

    pub async fn reset(&self) -> Result<(), ControllerError> {
        self.send(Command::Reset).await
    }

    pub async fn skip(&self) -> Result<(), ControllerError> {
        self.send(Command::Skip).await
    }

    /// Switch mode by hand. Refused while the timer is running.
    pub async fn switch_mode(&self, mode: TimerMode) -> Result<(), ControllerError> {
        if self.state.borrow().is_running() {
            return Err(ControllerError::SessionRunning);
        }
        self.send(Command::SwitchMode(mode)).await
    }

    pub async fn update_duration(&self, mode: TimerMode, minutes: u32) -> Result<(), ControllerError> {
        self.send(Command::UpdateDuration { mode, minutes }).await
    }

    async fn send(&self, command: Command) -> Result<(), ControllerError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ControllerError::Stopped)
    }
}

/// Owns the engine inside the controller task.
pub struct TimerController {
    engine: TimerEngine,
    policy: AutoTransitionPolicy,
    tick_interval: Duration,
    state_tx: watch::Sender<TimerState>,
    events: broadcast::Sender<Event>,
}

impl TimerController {
    /// Spawn the controller on the current tokio runtime.
    pub fn spawn(engine: TimerEngine, policy: AutoTransitionPolicy) -> TimerHandle {
        Self::spawn_with_interval(engine, policy, Duration::from_secs(1))
    }

    /// Spawn with a custom tick period. Each tick still removes one second.
    pub fn spawn_with_interval(
        engine: TimerEngine,
        policy: AutoTransitionPolicy,
        tick_interval: Duration,
    ) -> TimerHandle {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(engine.state().clone());
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let controller = Self {
            engine,
            policy,
            tick_interval,
            state_tx,
            events: events.clone(),
        };
        tokio::spawn(controller.run(commands_rx));

        TimerHandle {
            commands: commands_tx,
            state: state_rx,
            events,
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        let mut ticker: Option<Interval> = None;
        let mut transition: Option<Pin<Box<Sleep>>> = None;

        loop {
            let followup = tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                () = next_tick(&mut ticker) => self.on_tick(),
                () = transition_due(&mut transition) => {
                    self.on_transition_due();
                    Followup::CancelTransition
                }
            };

            match followup {
                Followup::Nothing => {}
                Followup::ScheduleTransition => {
                    transition = Some(Box::pin(time::sleep(self.policy.delay())));
                }
                Followup::CancelTransition => transition = None,
            }

            self.sync_ticker(&mut ticker);
            self.state_tx.send_replace(self.engine.state().clone());
        }

        tracing::debug!("timer controller stopped");
    }

    fn handle(&mut self, command: Command) -> Followup {
        match command {
            Command::Start => {
                let event = self.engine.start();
                self.emit(event);
                Followup::Nothing
            }
            Command::Pause => {
                let event = self.engine.pause();
                self.emit(event);
                Followup::Nothing
            }
            Command::Resume => {
                let event = self.engine.resume();
                self.emit(event);
                Followup::Nothing
            }
            Command::Reset => {
                let event = self.engine.reset();
                self.emit(event);
                Followup::CancelTransition
            }
            Command::Skip => match self.engine.skip_session() {
                Some(event) => {
                    self.emit(Some(event));
                    Followup::ScheduleTransition
                }
                None => Followup::Nothing,
            },
            Command::SwitchMode(mode) => {
                if self.engine.state().is_running() {
                    tracing::warn!(%mode, "ignoring mode switch during a running session");
                    return Followup::Nothing;
                }
                let event = self.engine.switch_mode(mode);
                self.emit(event);
                Followup::CancelTransition
            }
            Command::UpdateDuration { mode, minutes } => {
                let event = self.engine.update_duration(mode, minutes);
                self.emit(event);
                Followup::Nothing
            }
        }
    }

    fn on_tick(&mut self) -> Followup {
        match self.engine.tick() {
            Some(completed) => {
                self.emit(Some(completed));
                let counted = self.engine.complete_session();
                self.emit(counted);
                Followup::ScheduleTransition
            }
            None => Followup::Nothing,
        }
    }

    fn on_transition_due(&mut self) {
        if self.engine.status() != TimerStatus::Completed {
            return;
        }
        let state = self.engine.state();
        let next = next_mode(
            state.mode,
            state.cycle_count,
            self.engine.settings().long_break_interval,
        );
        tracing::debug!(from = %state.mode, to = %next, "auto transition");
        let switched = self.engine.switch_mode(next);
        self.emit(switched);
        if self.policy.should_auto_start(next) {
            let started = self.engine.start();
            self.emit(started);
        }
    }

    /// Keep the tick source alive exactly while the timer runs.
    fn sync_ticker(&self, ticker: &mut Option<Interval>) {
        match (self.engine.state().is_running(), ticker.is_some()) {
            (true, false) => {
                let mut interval =
                    time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                *ticker = Some(interval);
            }
            (false, true) => *ticker = None,
            _ => {}
        }
    }

    fn emit(&self, event: Option<Event>) {
        if let Some(event) = event {
            // No subscribers is not an error.
            let _ = self.events.send(event);
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending::<()>().await,
    }
}

async fn transition_due(transition: &mut Option<Pin<Box<Sleep>>>) {
    match transition {
        Some(sleep) => sleep.as_mut().await,
        None => pending::<()>().await,
    }
}
