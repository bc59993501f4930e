use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::util;

use self::{defaults::DefaultsArg, play::PlayArg};

mod defaults;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Write logs to this file (filtered by RUST_LOG, default `info`)
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Print the default game configuration as JSON
    DefaultConfig(#[clap(flatten)] DefaultsArg),
    /// Print the default key bindings as JSON
    DefaultKeys(#[clap(flatten)] DefaultsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    if let Some(path) = &args.log_file {
        util::init_file_logger(path)?;
    }
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::DefaultConfig(arg) => defaults::run_config(&arg)?,
        Mode::DefaultKeys(arg) => defaults::run_keys(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_play_options() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "play",
            "--difficulty",
            "hard",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
            "--json",
        ])
        .unwrap();
        assert!(matches!(args.mode, Some(Mode::Play(_))));

        let err = CommandArgs::try_parse_from(["blockfall", "play", "--difficulty", "insane"])
            .unwrap_err();
        assert!(err.to_string().contains("unknown difficulty"));
    }
}
