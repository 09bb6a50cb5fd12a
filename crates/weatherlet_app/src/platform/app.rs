use std::io::{self, IsTerminal};
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use desklet_logging::{desklet_debug, desklet_info, desklet_warn};
use weatherlet_core::{update, DeskletState, Msg, Phase};
use weatherlet_engine::{EngineHandle, FetchSettings};

use super::cli::Cli;
use super::config_file::{default_config_path, load_config};
use super::effects::EffectRunner;
use super::ui::render;
use super::{logging, watcher};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, &cli.log_file, cli.verbose);

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = load_config(&config_path)?;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let (engine, events) =
        EngineHandle::new(FetchSettings::default()).context("starting fetch engine")?;
    let runner = EffectRunner::new(engine, events, msg_tx.clone());

    // Dropping the watcher stops it, so it lives as long as the loop.
    let _watcher = if cli.no_watch {
        None
    } else {
        match watcher::watch_config(&config_path, msg_tx.clone()) {
            Ok(w) => Some(w),
            Err(err) => {
                desklet_warn!("Settings file will not be reloaded: {}", err);
                None
            }
        }
    };

    msg_tx
        .send(Msg::ConfigChanged(config))
        .context("queueing initial settings")?;
    drop(msg_tx);

    let ansi = io::stdout().is_terminal();
    let mut state = DeskletState::new();

    for msg in msg_rx.iter() {
        state = dispatch(state, msg, &runner);

        if state.consume_dirty() {
            let lines = render::render(&state.view());
            render::draw(&mut io::stdout().lock(), &lines, ansi)?;
        }
        if state.phase() == Phase::Stopped {
            break;
        }
    }

    desklet_info!("Shutting down");
    runner.shutdown();
    Ok(())
}

/// Applies one message and runs its effects. A reconfiguration is
/// acknowledged here, ahead of anything already waiting in the queue.
fn dispatch(state: DeskletState, msg: Msg, runner: &EffectRunner) -> DeskletState {
    desklet_debug!("Msg {}", msg.name());
    let (mut state, effects) = update(state, msg);
    if runner.run(effects) {
        let (next, effects) = update(state, Msg::ReconfigureApplied);
        state = next;
        let _ = runner.run(effects);
    }
    state
}
