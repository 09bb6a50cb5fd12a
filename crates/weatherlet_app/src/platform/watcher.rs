use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use desklet_logging::{desklet_info, desklet_warn};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use weatherlet_core::Msg;

use super::config_file::load_config;

/// Editors often replace a file by delete + rename; wait this long before
/// treating a removal as the desklet being taken off the desktop.
const REMOVAL_GRACE: Duration = Duration::from_millis(500);

/// Watches the settings file. Edits become `Msg::ConfigChanged`; removal of
/// the file becomes `Msg::Teardown`. The watcher stops when dropped.
pub(crate) fn watch_config(
    path: &Path,
    msg_tx: mpsc::Sender<Msg>,
) -> notify::Result<RecommendedWatcher> {
    let target = path.to_path_buf();
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let handler_target = target.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => handle_event(&handler_target, &event, &msg_tx),
        Err(err) => desklet_warn!("Settings watcher error: {}", err),
    })?;
    // Watch the directory so a replaced file is still seen.
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    desklet_info!("Watching {:?} for settings changes", target);
    Ok(watcher)
}

fn handle_event(target: &Path, event: &Event, msg_tx: &mpsc::Sender<Msg>) {
    if !concerns(target, event) {
        return;
    }
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => reload(target, msg_tx),
        EventKind::Remove(_) => {
            thread::sleep(REMOVAL_GRACE);
            if target.exists() {
                reload(target, msg_tx);
            } else {
                desklet_info!("Settings file {:?} removed; tearing down", target);
                let _ = msg_tx.send(Msg::Teardown);
            }
        }
        _ => {}
    }
}

fn concerns(target: &Path, event: &Event) -> bool {
    event
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == target.file_name())
}

fn reload(target: &Path, msg_tx: &mpsc::Sender<Msg>) {
    match load_config(target) {
        Ok(config) => {
            let _ = msg_tx.send(Msg::ConfigChanged(config));
        }
        // Keep running on the previous settings until the file is fixed.
        Err(err) => desklet_warn!("Ignoring settings change: {}", err),
    }
}
