use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameConfig, GameSession, RandomShapeSource, ShapeCatalog};
use clap::{Parser, Subcommand};

use crate::util;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run a game headlessly with random input and print a summary
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Options shared by every mode that starts a game session.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionArg {
    /// Game config file (JSON). Missing fields take their default values
    #[clap(long)]
    config: Option<PathBuf>,
    /// Shape definition file (JSON). Defaults to the seven tetrominoes
    #[clap(long)]
    shapes: Option<PathBuf>,
    /// Seed for the shape sequence
    #[clap(long)]
    seed: Option<u64>,
}

impl SessionArg {
    pub(crate) fn build_session(&self) -> anyhow::Result<GameSession> {
        let config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => GameConfig::default(),
        };
        let catalog = match &self.shapes {
            Some(path) => {
                let definitions = util::read_shapes_file(path)?;
                ShapeCatalog::from_definitions(&definitions, config.max_shape_size)
                    .with_context(|| format!("Invalid shape file: {}", path.display()))?
            }
            None => ShapeCatalog::standard(config.max_shape_size)
                .context("max_shape_size is too small for the standard shapes")?,
        };
        let source = self
            .seed
            .map_or_else(RandomShapeSource::new, RandomShapeSource::with_seed);
        let session =
            GameSession::new(config, catalog, source).context("Failed to start game session")?;
        Ok(session)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
