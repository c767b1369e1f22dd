use clap::Subcommand;
use mindwell_core::{DurationConfig, PresetUpdate};

use super::open_session;

#[derive(Subcommand)]
pub enum PresetAction {
    /// List all presets
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one preset as JSON
    Show { id: String },
    /// Apply a preset to the live configuration
    Apply { id: String },
    /// Save the current configuration as a new preset
    Save { name: String },
    /// Rename a user preset
    Rename { id: String, name: String },
    /// Edit fields of a user preset
    Edit {
        id: String,
        #[arg(long)]
        focus_secs: Option<u64>,
        #[arg(long)]
        short_rest_secs: Option<u64>,
        #[arg(long)]
        long_rest_secs: Option<u64>,
        #[arg(long)]
        target: Option<u32>,
        #[arg(long)]
        auto_rest: Option<bool>,
        #[arg(long)]
        auto_focus: Option<bool>,
    },
    /// Delete a user preset
    Delete { id: String },
}

pub fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    match action {
        PresetAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.presets().presets())?);
            } else {
                let active = session.presets().active_id();
                for preset in session.presets().presets() {
                    let marker = if Some(preset.id.as_str()) == active {
                        "*"
                    } else {
                        " "
                    };
                    let seeded = if preset.is_seeded() { " (seeded)" } else { "" };
                    println!(
                        "{marker} {} [{}/{}/{}s x{}]{seeded}  {}",
                        preset.name,
                        preset.settings.durations.focus_secs,
                        preset.settings.durations.short_rest_secs,
                        preset.settings.durations.long_rest_secs,
                        preset.settings.target_focus_count,
                        preset.id,
                    );
                }
            }
        }
        PresetAction::Show { id } => {
            let preset = session
                .presets()
                .get(&id)
                .ok_or_else(|| format!("preset '{id}' not found"))?;
            println!("{}", serde_json::to_string_pretty(preset)?);
        }
        PresetAction::Apply { id } => {
            let event = session.apply_preset(&id)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        PresetAction::Save { name } => {
            let id = session.save_preset(&name);
            println!("Preset created: {id}");
        }
        PresetAction::Rename { id, name } => {
            session.rename_preset(&id, &name)?;
            println!("Preset renamed: {id}");
        }
        PresetAction::Edit {
            id,
            focus_secs,
            short_rest_secs,
            long_rest_secs,
            target,
            auto_rest,
            auto_focus,
        } => {
            // Partial duration edits merge over the stored values.
            let durations = match (focus_secs, short_rest_secs, long_rest_secs) {
                (None, None, None) => None,
                _ => {
                    let current = session
                        .presets()
                        .get(&id)
                        .ok_or_else(|| format!("preset '{id}' not found"))?
                        .settings
                        .durations;
                    Some(DurationConfig::new(
                        focus_secs.unwrap_or(current.focus_secs),
                        short_rest_secs.unwrap_or(current.short_rest_secs),
                        long_rest_secs.unwrap_or(current.long_rest_secs),
                    ))
                }
            };
            session.update_preset(
                &id,
                PresetUpdate {
                    name: None,
                    durations,
                    target_focus_count: target,
                    auto_start_rest: auto_rest,
                    auto_start_focus: auto_focus,
                },
            )?;
            println!("Preset updated: {id}");
        }
        PresetAction::Delete { id } => {
            session.delete_preset(&id)?;
            println!("Preset deleted: {id}");
        }
    }

    Ok(())
}
