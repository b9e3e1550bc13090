use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::Level;

use crate::apps::AppKind;
use crate::constants::DEFAULT_POLL_MS;
use crate::tracing_sub::LogTarget;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "term-desktop",
    version = env!("CARGO_PKG_VERSION"),
    about = "A retro desktop shell for the terminal"
)]
pub struct Cli {
    /// Silence the startup, click and error sounds.
    #[arg(long = "no-sound")]
    pub no_sound: bool,

    /// Input poll interval in milliseconds.
    #[arg(long = "poll-ms", value_name = "MS", default_value_t = DEFAULT_POLL_MS)]
    pub poll_ms: u64,

    /// Write logs to this file. Logging is discarded otherwise.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Maximum log level (trace, debug, info, warn, error).
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Open an application at startup. May be repeated.
    #[arg(long = "open", value_name = "APP", value_enum)]
    pub open: Vec<LaunchArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LaunchArg {
    Notepad,
    Calculator,
    Paint,
    Minesweeper,
    CpsTester,
    MyComputer,
    RecycleBin,
}

impl From<LaunchArg> for AppKind {
    fn from(arg: LaunchArg) -> Self {
        match arg {
            LaunchArg::Notepad => AppKind::Notepad,
            LaunchArg::Calculator => AppKind::Calculator,
            LaunchArg::Paint => AppKind::Paint,
            LaunchArg::Minesweeper => AppKind::Minesweeper,
            LaunchArg::CpsTester => AppKind::CpsTester,
            LaunchArg::MyComputer => AppKind::MyComputer,
            LaunchArg::RecycleBin => AppKind::RecycleBin,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("poll interval must be between 1 and 1000 ms, got {0}")]
    PollInterval(u64),
    #[error("unknown log level `{0}`")]
    LogLevel(String),
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub sound: bool,
    pub poll_interval: Duration,
    pub log_target: LogTarget,
    pub log_level: Level,
    pub open: Vec<AppKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sound: true,
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            log_target: LogTarget::Sink,
            log_level: Level::INFO,
            open: Vec::new(),
        }
    }
}

impl TryFrom<&Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(1..=1000).contains(&cli.poll_ms) {
            return Err(ConfigError::PollInterval(cli.poll_ms));
        }
        let log_level = Level::from_str(&cli.log_level)
            .map_err(|_| ConfigError::LogLevel(cli.log_level.clone()))?;
        let log_target = match &cli.log_file {
            Some(path) => LogTarget::File(path.clone()),
            None => LogTarget::Sink,
        };
        Ok(Self {
            sound: !cli.no_sound,
            poll_interval: Duration::from_millis(cli.poll_ms),
            log_target,
            log_level,
            open: cli.open.iter().copied().map(AppKind::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("term-desktop").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::try_from(&parse(&[])).unwrap();
        assert!(config.sound);
        assert_eq!(config.poll_interval, Duration::from_millis(16));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.log_target, LogTarget::Sink);
        assert!(config.open.is_empty());
    }

    #[test]
    fn flags_are_applied() {
        let cli = parse(&[
            "--no-sound",
            "--poll-ms",
            "50",
            "--log-file",
            "/tmp/desk.log",
            "--log-level",
            "debug",
            "--open",
            "calculator",
            "--open",
            "cps-tester",
        ]);
        let config = Config::try_from(&cli).unwrap();
        assert!(!config.sound);
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(
            config.log_target,
            LogTarget::File(PathBuf::from("/tmp/desk.log"))
        );
        assert_eq!(config.open, vec![AppKind::Calculator, AppKind::CpsTester]);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(
            Config::try_from(&parse(&["--poll-ms", "0"])).unwrap_err(),
            ConfigError::PollInterval(0)
        );
        assert_eq!(
            Config::try_from(&parse(&["--log-level", "loud"])).unwrap_err(),
            ConfigError::LogLevel("loud".to_string())
        );
    }
}
