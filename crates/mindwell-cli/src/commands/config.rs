use clap::Subcommand;
use mindwell_core::DurationConfig;

use super::open_session;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the live configuration as JSON
    Show,
    /// Set the three phase durations, in seconds
    SetDurations {
        focus: u64,
        short_rest: u64,
        long_rest: u64,
    },
    /// Set the focus-phase count per cycle
    SetTarget { count: u32 },
    /// Toggle auto-starting rests after a focus completes
    SetAutoRest {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Toggle auto-starting focus after a rest completes
    SetAutoFocus {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    let detached = match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(session.engine().settings())?);
            return Ok(());
        }
        ConfigAction::SetDurations {
            focus,
            short_rest,
            long_rest,
        } => session.set_durations(DurationConfig::new(focus, short_rest, long_rest)),
        ConfigAction::SetTarget { count } => session.set_target_focus_count(count),
        ConfigAction::SetAutoRest { enabled } => session.set_auto_start_rest(enabled),
        ConfigAction::SetAutoFocus { enabled } => session.set_auto_start_focus(enabled),
    };

    if let Some(event) = detached {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }
    println!("{}", serde_json::to_string_pretty(session.engine().settings())?);
    Ok(())
}
