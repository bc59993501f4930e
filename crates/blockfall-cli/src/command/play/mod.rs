use std::{fs, path::PathBuf};

use anyhow::Context;
use blockfall_engine::{Difficulty, GameConfig, GameSession, PieceSeed};
use blockfall_runtime::Runtime;
use log::info;

use crate::{keys::KeyBindings, util};

use self::{app::PlayApp, summary::SessionSummary};

mod app;
mod summary;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Difficulty (Easy, Normal or Hard); overrides the configuration file
    #[clap(long)]
    difficulty: Option<Difficulty>,
    /// Piece sequence seed as 32 hex digits (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Game configuration file (JSON, see `default-config`)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Key bindings file (JSON, see `default-keys`)
    #[clap(long)]
    keys: Option<PathBuf>,
    /// Hide the landing preview of the falling piece
    #[clap(long)]
    no_ghost: bool,
    /// Print the end-of-game summary as JSON
    #[clap(long)]
    json: bool,
}

fn load_config(arg: &PlayArg) -> anyhow::Result<GameConfig> {
    let mut config = match &arg.config {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| {
                format!("Failed to read configuration file: {}", path.display())
            })?;
            GameConfig::from_json_str(&json)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(difficulty) = arg.difficulty {
        config.difficulty = difficulty;
    }
    Ok(config)
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = load_config(arg)?;
    let bindings = match &arg.keys {
        Some(path) => util::read_json_file("key bindings", path)?,
        None => KeyBindings::default(),
    };

    let session = match arg.seed {
        Some(seed) => GameSession::with_seed(config, seed),
        None => GameSession::new(config),
    };
    let mut app = PlayApp::new(session, bindings, !arg.no_ghost);
    Runtime::new()
        .run(&mut app)
        .context("Terminal session failed")?;

    let summary = SessionSummary::new(app.session());
    info!("session ended: {:?}, score {}", summary.outcome, summary.score);
    if arg.json {
        util::write_json(&summary, None)?;
    } else {
        print!("{summary}");
    }
    Ok(())
}
