use std::path::PathBuf;

use blockfall_engine::{GameSession, GameStats, SessionState, TickInput};
use rand::{Rng, SeedableRng as _, prelude::StdRng};
use serde::Serialize;

use crate::{command::SessionArg, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    session: SessionArg,
    /// Number of ticks to run unless the game ends first
    #[clap(long, default_value_t = 3600)]
    ticks: u64,
    /// Ticks per simulated second
    #[clap(long, default_value_t = 60)]
    fps: u16,
    /// Write the JSON summary to this file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationSummary<'a> {
    seed: u64,
    ticks: u64,
    state: SessionState,
    normal_speed: f32,
    rows_cleared_since_speedup: usize,
    stats: &'a GameStats,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        session: session_arg,
        ticks,
        fps,
        output,
    } = arg;
    anyhow::ensure!(*fps > 0, "--fps must be positive");

    let seed = session_arg.seed.unwrap_or_else(|| rand::rng().random());
    let session_arg = SessionArg {
        seed: Some(seed),
        ..session_arg.clone()
    };
    let mut session = session_arg.build_session()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let dt = 1.0 / f32::from(*fps);

    let mut ticks_run = 0;
    while ticks_run < *ticks && !session.state().is_game_over() {
        let input = random_input(&mut rng);
        session.advance(dt, &input);
        settle_collapses(&mut session);
        ticks_run += 1;
    }

    print!("{}", session.field());
    let summary = SimulationSummary {
        seed,
        ticks: ticks_run,
        state: session.state(),
        normal_speed: session.speed().current_normal_speed(),
        rows_cleared_since_speedup: session.speed().rows_cleared_since_speedup(),
        stats: session.stats(),
    };
    util::write_json(&summary, output.as_deref())
}

/// Input of a player mashing keys: mostly sideways moves, with an occasional
/// rotation or drop.
fn random_input<R>(rng: &mut R) -> TickInput
where
    R: Rng + ?Sized,
{
    TickInput {
        horizontal: f32::from(rng.random_range(-1i8..=1)),
        rotate: rng.random_bool(0.1),
        drop: rng.random_bool(0.02),
    }
}

/// Nothing is animated headlessly, so every collapse settles at once.
fn settle_collapses(session: &mut GameSession) {
    for event in session.take_events() {
        if event.is_row_collapsed() {
            session.notify_collapse_settled();
        }
    }
}
