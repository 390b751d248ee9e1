//! Durable audit log setup.
//!
//! The binary calls, in order:
//! 1. [`ensure_log_dir`] - create the log directory if it is missing
//! 2. [`init`] - open the log file and install the subscriber
//!
//! The returned [`LoggingGuard`] must be held for the life of the process.
//! Dropping it uninstalls the subscriber and closes the file.
//!
//! # Output
//!
//! - **file**: `[YYYY-MM-DD HH:MM:SS] [LEVEL]: message`, appended
//! - **stderr**: message only (optional echo)
//!
//! stdout is reserved for directives and never receives log output.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

use crate::error::{AgiError, Result};

/// Timestamp layout used in the durable log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where and how to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory holding the log file (created if absent).
    pub dir: PathBuf,
    /// File name inside `dir`.
    pub file_name: String,
    /// Echo messages to stderr.
    pub console: bool,
}

impl LogConfig {
    /// Full path of the log file.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Keeps the subscriber installed until dropped.
#[must_use = "dropping the guard uninstalls the audit log"]
pub struct LoggingGuard {
    _default: DefaultGuard,
    path: PathBuf,
}

impl LoggingGuard {
    /// Path of the log file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Create `dir` and its parents if they do not exist.
pub fn ensure_log_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| AgiError::LogSetup {
        path: dir.to_path_buf(),
        source,
    })
}

/// Open the log file in append mode and install the subscriber for the
/// current thread.
///
/// The log directory must already exist (see [`ensure_log_dir`]).
pub fn init(config: &LogConfig) -> Result<LoggingGuard> {
    let path = config.file_path();
    let file = open_append(&path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .event_format(AuditFormat);

    let console_layer = config.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .without_time()
            .with_level(false)
            .with_target(false)
    });

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(file_layer)
        .with(console_layer);

    let default = tracing::subscriber::set_default(subscriber);
    Ok(LoggingGuard {
        _default: default,
        path,
    })
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AgiError::LogSetup {
            path: path.to_path_buf(),
            source,
        })
}

/// Event format for the durable log.
struct AuditFormat;

impl<S, N> FormatEvent<S, N> for AuditFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let now = chrono::Local::now().format(TIMESTAMP_FORMAT);
        write!(writer, "[{}] [{}]: ", now, event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
