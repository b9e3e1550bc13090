use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::window::WindowId;

/// A window manager request whose precondition did not hold. Nothing was changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WmError {
    #[error("no window with id {0}")]
    UnknownWindow(WindowId),
    #[error("{0} is minimized")]
    Minimized(WindowId),
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}
