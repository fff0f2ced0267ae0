use crate::{
    command::{SessionArg, play::app::PlayApp},
    tui::Tui,
};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    session: SessionArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { session } = arg;

    let mut app = PlayApp::new(session.build_session()?);
    Tui::new().run(&mut app)?;

    let stats = app.session().stats();
    println!(
        "Rows cleared: {}, pieces locked: {}",
        stats.total_rows_cleared(),
        stats.locked_pieces()
    );
    Ok(())
}
