use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing::Level;

static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(&'static Mutex<File>),
    // The terminal is in the alternate screen, so stderr would corrupt it.
    Sink(io::Sink),
}

impl DelegatingWriter {
    fn new() -> Self {
        match LOG_FILE.get() {
            Some(file) => DelegatingWriter {
                inner: DelegatingInner::File(file),
            },
            None => DelegatingWriter {
                inner: DelegatingInner::Sink(io::sink()),
            },
        }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            DelegatingInner::Sink(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            DelegatingInner::Sink(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SubscriberMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new()
    }
}

/// Route log output to `path` (appending). Only the first call takes effect.
pub fn set_log_file(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = LOG_FILE.set(Mutex::new(file));
    Ok(())
}

/// Initialize the tracing subscriber, writing to the log file when one was
/// configured and discarding output otherwise. Safe to call multiple times;
/// subsequent calls are no-ops for the global subscriber.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    if let Some(path) = log_file {
        set_log_file(path)?;
    }
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_writer(SubscriberMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
    Ok(())
}
