use clap::Subcommand;
use researchdoro_core::{next_mode, Config, Event, TimerController, TimerEngine, TimerMode};
use tokio::sync::broadcast::error::RecvError;

use super::{runtime, CommandResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a live timer, printing events as JSON lines
    Run {
        /// Mode to begin in (work, short-break, long-break)
        #[arg(long, default_value = "work")]
        mode: TimerMode,
        /// Stop after this many completed work sessions
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        sessions: u32,
    },
    /// Print the mode that follows a completed interval
    NextMode {
        /// Mode that just completed
        #[arg(long)]
        mode: TimerMode,
        /// Work sessions completed so far
        #[arg(long)]
        cycle_count: u32,
        /// Work sessions per long break (defaults to the configured value)
        #[arg(long)]
        interval: Option<u32>,
    },
}

pub fn run(action: TimerAction) -> CommandResult {
    match action {
        TimerAction::Run { mode, sessions } => {
            let config = Config::load()?;
            runtime()?.block_on(run_live(config, mode, sessions))?;
        }
        TimerAction::NextMode {
            mode,
            cycle_count,
            interval,
        } => {
            let interval = match interval {
                Some(interval) => interval,
                None => Config::load()?.timer.settings.long_break_interval,
            };
            println!("{}", next_mode(mode, cycle_count, interval));
        }
    }
    Ok(())
}

async fn run_live(config: Config, mode: TimerMode, sessions: u32) -> CommandResult {
    let policy = config.timer.policy;
    let mut engine = TimerEngine::new(config.timer.settings);
    if mode != engine.mode() {
        engine.switch_mode(mode);
    }

    let handle = TimerController::spawn(engine, policy.clone());
    let mut events = handle.subscribe();
    handle.start().await?;

    let mut completed = 0u32;
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event output fell behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        println!("{}", serde_json::to_string(&event)?);

        match event {
            Event::SessionCompleted {
                mode: TimerMode::Work,
                ..
            } => {
                completed += 1;
                if completed >= sessions {
                    break;
                }
            }
            // Keep cycling when the policy leaves the next interval idle.
            Event::ModeSwitched { to, .. } if !policy.should_auto_start(to) => {
                handle.start().await?;
            }
            _ => {}
        }
    }
    Ok(())
}
