mod app;
mod cli;
mod config_file;
mod effects;
mod logging;
mod ui;
mod watcher;

pub use app::run_app;
