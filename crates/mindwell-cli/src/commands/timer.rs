use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use clap::Subcommand;
use mindwell_core::storage::{self, keys, FileStore};
use mindwell_core::SessionStats;

use super::{open_session, PhaseArg};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or resume) the current phase
    Start,
    /// Pause the countdown
    Pause,
    /// Stop and reseed the current phase
    Reset,
    /// Switch to another phase (stops the clock)
    Switch {
        #[arg(value_enum)]
        phase: PhaseArg,
    },
    /// Run the countdown in the foreground, one tick per second
    Run {
        /// Stop after this many seconds even if no phase completed
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Print current timer state as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    match action {
        TimerAction::Start => {
            if let Some(event) = session.start() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            }
        }
        TimerAction::Pause => {
            if let Some(event) = session.pause() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            }
        }
        TimerAction::Reset => {
            let event = session.reset();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Switch { phase } => {
            let event = session.switch_mode(phase.into());
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Run { seconds } => {
            run_foreground(&mut session, seconds)?;
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        }
    }

    Ok(())
}

/// Drive the engine at one tick per second until a phase completes without
/// auto-starting its successor, or the optional budget runs out.
///
/// Completions recorded while running are folded into the persisted stats.
fn run_foreground(
    session: &mut mindwell_core::Session,
    seconds: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stats_store = FileStore::open()?;
    let stats: SessionStats = storage::load(&stats_store, keys::SESSION_STATS, SessionStats::new());
    let shared = Rc::new(RefCell::new(stats));
    session.set_recorder(Box::new(Rc::clone(&shared)));

    if let Some(event) = session.start() {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }

    let mut elapsed = 0u64;
    loop {
        std::thread::sleep(Duration::from_secs(1));
        elapsed += 1;

        if let Some(event) = session.tick() {
            println!("{}", serde_json::to_string_pretty(&event)?);
            storage::save(&mut stats_store, keys::SESSION_STATS, &*shared.borrow());
            if !session.engine().is_running() {
                break;
            }
        }

        if let Some(budget) = seconds {
            if elapsed >= budget {
                if let Some(event) = session.pause() {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
                break;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}
