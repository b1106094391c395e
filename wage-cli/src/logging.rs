//! Process-wide log setup for the `wage-projection` binary.
//!
//! Events go to stderr and, once a path is known, to a log file. The level
//! filter and the console gate can both be changed after startup, because
//! the scenario file that names them is read after logging is running.

use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, reload};

const DEFAULT_FILTER: &str = "info";

// --- Event format ---

/// `<local time> <LEVEL> <crate> <fields>`, colored when the writer allows.
struct WageLogFormat;

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "1;31",
        Level::WARN => "1;33",
        Level::INFO => "1;32",
        Level::DEBUG => "1;34",
        Level::TRACE => "1;35",
    }
}

fn painted(
    writer: &mut Writer<'_>,
    color: &str,
    text: impl std::fmt::Display,
) -> std::fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "\x1b[{color}m{text}\x1b[0m ")
    } else {
        write!(writer, "{text} ")
    }
}

impl<S, N> FormatEvent<S, N> for WageLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
        let krate = meta.target().split("::").next().unwrap_or_default();

        painted(&mut writer, "2", timestamp)?;
        painted(&mut writer, level_color(*meta.level()), format_args!("{:>5}", meta.level()))?;
        painted(&mut writer, "36", krate)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Log file ---

type SharedFile = Arc<Mutex<Option<File>>>;

/// Writer for a log file chosen after startup. Output is dropped until a
/// file is set.
#[derive(Clone)]
struct LogFile(SharedFile);

struct LogFileGuard<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileGuard<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.as_mut().map_or(Ok(buf.len()), |file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), |file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileGuard(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

// --- Runtime controls ---

type Reload<T> = Box<dyn Fn(T) -> Result<()> + Send + Sync>;

/// Handles kept after initialization so later settings can take effect.
struct Controls {
    level: Reload<EnvFilter>,
    console: Reload<EnvFilter>,
    file: SharedFile,
}

static CONTROLS: OnceLock<Controls> = OnceLock::new();

fn controls() -> Result<&'static Controls> {
    CONTROLS.get().ok_or_else(|| anyhow!("logging not yet initialized"))
}

fn reloader<S>(handle: reload::Handle<EnvFilter, S>) -> Reload<EnvFilter>
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |filter| {
        handle
            .reload(filter)
            .map_err(|e| anyhow!("log filter reload failed: {e}"))
    })
}

/// Installs the global subscriber. Later calls do nothing.
///
/// The level starts at `RUST_LOG`, or `info` when unset.
pub fn init_logging() {
    if CONTROLS.get().is_some() {
        return;
    }

    let file: SharedFile = Arc::new(Mutex::new(None));
    let initial = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let (level_filter, level_handle) = reload::Layer::new(initial);
    // The console gate only switches output on or off; the level filter
    // above still decides what is recorded.
    let (console_gate, console_handle) = reload::Layer::new(EnvFilter::new("trace"));

    let console = tracing_subscriber::fmt::layer()
        .event_format(WageLogFormat)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(console_gate);
    let log_file = tracing_subscriber::fmt::layer()
        .event_format(WageLogFormat)
        .with_ansi(false)
        .with_writer(LogFile(file.clone()));

    let installed = tracing_subscriber::registry()
        .with(level_filter)
        .with(console)
        .with(log_file)
        .try_init();
    if installed.is_ok() {
        let _ = CONTROLS.set(Controls {
            level: reloader(level_handle),
            console: reloader(console_handle),
            file,
        });
    }
}

/// Replaces the level filter. Takes a bare level such as `debug` or a full
/// directive such as `wage_core=trace,info`.
pub fn set_log_level(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| anyhow!("invalid log level '{directive}': {e}"))?;
    (controls()?.level)(filter)
}

/// Turns console output on or off. The log file is unaffected.
pub fn set_console_enabled(enabled: bool) -> Result<()> {
    let gate = EnvFilter::new(if enabled { "trace" } else { "off" });
    (controls()?.console)(gate)
}

/// Appends log output to `path` from now on, replacing any earlier file.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let controls = controls()?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;
    *controls.file.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
    Ok(())
}

/// Applies the resolved log settings of a run.
pub fn configure(
    level: Option<&str>,
    file: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    if quiet {
        set_console_enabled(false)?;
    }
    if let Some(level) = level {
        set_log_level(level)?;
    }
    if let Some(path) = file {
        enable_file_logging(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Logging is global to the test process, so its whole lifecycle is
    // checked in a single test.
    #[test]
    fn test_log_controls_lifecycle() {
        assert!(set_log_level("debug").is_err());
        assert!(set_console_enabled(false).is_err());
        assert!(configure(None, None, true).is_err());

        init_logging();
        init_logging();

        assert!(set_log_level("debug").is_ok());
        assert!(set_log_level("wage_core=trace,info").is_ok());
        assert!(set_log_level("wage_core=loudest").is_err());
        assert!(set_console_enabled(false).is_ok());
        assert!(set_console_enabled(true).is_ok());

        let path = std::env::temp_dir().join(format!("wage-cli-log-{}.log", std::process::id()));
        configure(Some("info"), Some(&path), false).unwrap();
        tracing::warn!("file logging check");

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(contents.contains("file logging check"));
        assert!(contents.contains(" WARN "));
        assert!(contents.contains("wage_cli"));
    }
}
