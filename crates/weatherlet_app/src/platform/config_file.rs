use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use desklet_logging::desklet_info;
use directories::ProjectDirs;
use thiserror::Error;
use weatherlet_core::{ConfigError, DeskletConfig};

pub(crate) const CONFIG_FILENAME: &str = "weatherlet.ron";

#[derive(Debug, Error)]
pub(crate) enum ConfigFileError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid settings in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// `<user config dir>/weatherlet/weatherlet.ron`, or `./weatherlet.ron` when
/// the platform has no config directory.
pub(crate) fn default_config_path() -> PathBuf {
    ProjectDirs::from("org", "weatherlet", "weatherlet")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// Reads, parses and validates a settings file.
pub(crate) fn load_config(path: &Path) -> Result<DeskletConfig, ConfigFileError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: DeskletConfig =
        ron::from_str(&content).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    config.validate().map_err(|source| ConfigFileError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    desklet_info!(
        "Loaded settings from {:?}: url={} delay={}s measures={}",
        path,
        config.url,
        config.delay_seconds,
        config.measures.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;
    use weatherlet_core::MeasureConfig;

    use super::*;

    fn write_settings(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_valid_settings() {
        let file = write_settings(
            r#"(
                url: "http://station.local/",
                delay_seconds: 60,
                measures: [(label: "Temp", regex: "Temp: (\\d+)F")],
            )"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.delay_seconds, 60);
        assert_eq!(
            config.measures,
            vec![MeasureConfig::new("Temp", r"Temp: (\d+)F")]
        );
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.ron")).unwrap_err();
        assert!(matches!(err, ConfigFileError::Read { .. }));
    }

    #[test]
    fn malformed_ron_is_parse_error() {
        let file = write_settings("(url: ");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse { .. }));
    }

    #[test]
    fn zero_delay_is_rejected() {
        let file = write_settings(r#"(url: "http://station.local/", delay_seconds: 0)"#);
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::Invalid {
                source: ConfigError::ZeroDelay,
                ..
            }
        ));
    }

    #[test]
    fn default_path_ends_with_file_name() {
        assert!(default_config_path().ends_with(CONFIG_FILENAME));
    }
}
