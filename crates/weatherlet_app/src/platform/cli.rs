use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Polls a weather station page and shows the values extracted from it.
#[derive(Debug, Parser)]
#[command(name = "weatherlet", version)]
pub struct Cli {
    /// Settings file (RON). Defaults to the per-user config directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where log output goes; the terminal is normally busy showing the panel.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[arg(long, default_value = "weatherlet.log")]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not reload the settings file when it changes.
    #[arg(long)]
    pub no_watch: bool,
}
