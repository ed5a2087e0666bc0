use std::{
    env, fs,
    io::{Error, ErrorKind},
    path::PathBuf,
};

/// Locations of configuration and log files
///
/// Follows the XDG Base Directory layout.
pub struct ConfigPaths;

impl ConfigPaths {
    /// Configuration directory, `$XDG_CONFIG_HOME/pulselink` or
    /// `$HOME/.config/pulselink`
    ///
    /// # Errors
    /// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set
    pub fn config_dir() -> Result<PathBuf, Error> {
        let config_home = env::var("XDG_CONFIG_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.config")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_CONFIG_HOME nor HOME environment variable found",
                )
            })?;

        Ok(PathBuf::from(config_home).join("pulselink"))
    }

    /// Log directory, `$XDG_STATE_HOME/pulselink/logs` or
    /// `$HOME/.local/state/pulselink/logs`
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if no base directory is known or it cannot be created
    pub fn log_dir() -> Result<PathBuf, Error> {
        let state_home = env::var("XDG_STATE_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.local/state")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_STATE_HOME nor HOME environment variable found",
                )
            })?;

        let log_dir = PathBuf::from(state_home).join("pulselink").join("logs");
        if !log_dir.exists() {
            fs::create_dir_all(&log_dir)?;
        }
        Ok(log_dir)
    }

    /// Main configuration file
    ///
    /// `PULSELINK_CONFIG` overrides the default location.
    ///
    /// # Errors
    /// Returns an error if the configuration directory cannot be determined
    pub fn main_config() -> Result<PathBuf, Error> {
        if let Ok(path) = env::var("PULSELINK_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
