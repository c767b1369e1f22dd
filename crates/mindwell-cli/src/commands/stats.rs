use clap::Subcommand;
use mindwell_core::storage::{self, keys, FileStore};
use mindwell_core::SessionStats;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print recorded session aggregates
    Show,
    /// Clear recorded session aggregates
    Reset,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileStore::open()?;

    match action {
        StatsAction::Show => {
            let stats: SessionStats =
                storage::load(&store, keys::SESSION_STATS, SessionStats::new());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Reset => {
            storage::save(&mut store, keys::SESSION_STATS, &SessionStats::new());
            println!("Stats cleared");
        }
    }

    Ok(())
}
