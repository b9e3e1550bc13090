use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::error::ShellError;

/// Where log records go. Stderr is never used while the alternate screen is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Sink,
    File(PathBuf),
}

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    Sink(io::Sink),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(file) => match file.lock() {
                Ok(mut file) => file.write(buf),
                Err(_) => Ok(buf.len()),
            },
            DelegatingInner::Sink(sink) => sink.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(file) => match file.lock() {
                Ok(mut file) => file.flush(),
                Err(_) => Ok(()),
            },
            DelegatingInner::Sink(sink) => sink.flush(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl SubscriberMakeWriter {
    pub fn for_target(target: &LogTarget) -> Result<Self, ShellError> {
        match target {
            LogTarget::Sink => Ok(Self::default()),
            LogTarget::File(path) => {
                let file = open_log(path).map_err(|source| ShellError::LogFile {
                    path: path.clone(),
                    source,
                })?;
                Ok(Self {
                    file: Some(Arc::new(Mutex::new(file))),
                })
            }
        }
    }
}

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match &self.file {
            Some(file) => DelegatingInner::File(Arc::clone(file)),
            None => DelegatingInner::Sink(io::sink()),
        };
        DelegatingWriter { inner }
    }
}

/// Install the global subscriber writing to `target`. Safe to call multiple
/// times; only the first successful call installs a subscriber.
pub fn init(target: &LogTarget, level: Level) -> Result<(), ShellError> {
    let writer = SubscriberMakeWriter::for_target(target)?;
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn file_target_appends_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desktop.log");
        let make = SubscriberMakeWriter::for_target(&LogTarget::File(path.clone())).unwrap();
        make.make_writer().write_all(b"first\n").unwrap();
        make.make_writer().write_all(b"second\n").unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "first\nsecond\n");
    }

    #[test]
    fn unopenable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("desktop.log");
        let err = SubscriberMakeWriter::for_target(&LogTarget::File(path)).unwrap_err();
        assert!(matches!(err, ShellError::LogFile { .. }));
    }

    #[test]
    fn init_is_repeatable() {
        init(&LogTarget::Sink, Level::DEBUG).unwrap();
        init(&LogTarget::Sink, Level::INFO).unwrap();
        tracing::debug!("still fine");
    }
}
