use std::io;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use skulk::game::State;
use skulk::protocol::Judge;

fn main() -> Result<()> {
    // stdout belongs to the judge; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut judge = Judge::new(stdin.lock(), stdout.lock());

    let (grid, rules) = judge.read_match().context("parsing the match header")?;
    info!("map:\n{}", grid);
    info!(?rules, "match start");

    let mut state = State::new(grid, rules);
    let mut turn = 0;

    while let Some(snapshot) = judge.read_snapshot().context("parsing a snapshot")? {
        let action = state.tick(&snapshot);
        debug!(turn,
               sanity = snapshot.me.sanity,
               allies = snapshot.allies.len(),
               wanderers = snapshot.wanderers.len(),
               slashers = snapshot.slashers.len(),
               spawnings = snapshot.spawnings.len(),
               ?action,
               "decided");
        judge.send(&action).context("sending an action")?;
        turn += 1;
    }

    info!(turn, "feed closed, match over");
    Ok(())
}
