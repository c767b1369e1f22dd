pub mod config;
pub mod preset;
pub mod stats;
pub mod timer;

use clap::ValueEnum;
use mindwell_core::{FileStore, Phase, Session};

/// Open the session backed by the default data directory.
pub(crate) fn open_session() -> Result<Session, Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    Ok(Session::load(Box::new(store)))
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Focus,
    ShortRest,
    LongRest,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Focus => Phase::Focus,
            PhaseArg::ShortRest => Phase::ShortRest,
            PhaseArg::LongRest => Phase::LongRest,
        }
    }
}
