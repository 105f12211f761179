use std::{
    fs::{File, OpenOptions},
    io::{LineWriter, Write},
    path::Path,
    sync::Mutex,
};

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::trace::trace::TraceEvent;

/// Engine transitions as JSON lines, one per dispatched event.
///
/// A trace file that cannot be opened turns the logger into a no-op; replay
/// never fails because of tracing.
pub struct TraceLogger {
    sink: Option<Mutex<LineWriter<File>>>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let sink = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(|f| Mutex::new(LineWriter::new(f)))
            .map_err(|e| warn!(path = %path.display(), error = %e, "trace file unavailable, tracing off"))
            .ok();
        Self { sink }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, event = %event.event, "trace event not serializable");
                return;
            }
        };
        let Ok(mut writer) = sink.lock() else {
            warn!("trace sink poisoned, event dropped");
            return;
        };
        if let Err(e) = writeln!(writer, "{line}") {
            warn!(error = %e, "trace write failed");
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the verbosity count.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
