//! Tracing subscriber: console formatter and persistent log file.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use super::utils::{log_file_path, strip_ansi, utc_now};

/// Target of [`Log::phase`](super::Log::phase) events.
pub(super) const PHASE_TARGET: &str = "cubepp::phase";
/// Target of [`Log::preview`](super::Log::preview) events.
pub(super) const PREVIEW_TARGET: &str = "cubepp::preview";

/// How an event is rendered, shared by the console and the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Phase,
    Preview,
    Error,
    Warning,
    Info,
    Debug,
}

impl Kind {
    fn of(metadata: &tracing::Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (tracing::Level::ERROR, _) => Self::Error,
            (tracing::Level::WARN, _) => Self::Warning,
            (tracing::Level::INFO, PHASE_TARGET) => Self::Phase,
            (tracing::Level::INFO, PREVIEW_TARGET) => Self::Preview,
            (tracing::Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Plain-text prefix used in the log file.
    const fn file_prefix(self) -> &'static str {
        match self {
            Self::Phase => "==> ",
            Self::Preview => "    ~ ",
            Self::Error => "    error: ",
            Self::Warning => "    ! ",
            Self::Info => "    ",
            Self::Debug => "    . ",
        }
    }
}

/// The `message` field of an event.
#[derive(Default)]
struct MessageText(String);

impl tracing::field::Visit for MessageText {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0 = value.to_string();
        }
    }
}

fn message_of(event: &tracing::Event<'_>) -> String {
    let mut text = MessageText::default();
    event.record(&mut text);
    text.0
}

/// Appends every event at `DEBUG` and above to `<command>.log`, timestamped
/// and without ANSI styling.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command` and write the run header.
    ///
    /// Returns `None` when the file cannot be created.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let header = format!(
            "# cubepp {} {command} {}\n",
            env!("CARGO_PKG_VERSION"),
            utc_now("%Y-%m-%d %H:%M:%S"),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let kind = Kind::of(event.metadata());
        let msg = strip_ansi(&message_of(event));
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "[{}] {}{msg}", utc_now("%H:%M:%S"), kind.file_prefix()).ok();
        }
    }
}

/// Console rendering: bold phase headers, `!` warnings, `~` previews.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let msg = message_of(event);
        match Kind::of(event.metadata()) {
            Kind::Phase => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::Preview => writeln!(writer, "  \x1b[36m~\x1b[0m {msg}"),
            Kind::Error => writeln!(writer, "\x1b[31merror:\x1b[0m {msg}"),
            Kind::Warning => writeln!(writer, "\x1b[33m!\x1b[0m {msg}"),
            Kind::Info => writeln!(writer, "  {msg}"),
            Kind::Debug => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global subscriber for one `command` run.
///
/// Warnings and errors go to stderr, everything else to stdout; `debug`
/// reaches the console only with `verbose`. The log file always receives
/// `debug` and above. Call once, before anything logs.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
