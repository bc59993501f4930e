use std::path::PathBuf;

use blockfall_engine::GameConfig;

use crate::{keys::KeyBindings, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultsArg {
    /// Output file path (default: stdout)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run_config(arg: &DefaultsArg) -> anyhow::Result<()> {
    util::write_json(&GameConfig::default(), arg.output.as_deref())
}

pub(crate) fn run_keys(arg: &DefaultsArg) -> anyhow::Result<()> {
    util::write_json(&KeyBindings::default(), arg.output.as_deref())
}
