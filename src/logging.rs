//! Tracing setup: the console plus per-severity log files.

use crate::config::LogFormat;
use crate::error::AppError;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Target prefix of events emitted by this crate.
const CRATE_TARGET: &str = "poolsniper";

/// A log file and the most verbose level it keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFile {
    pub name: &'static str,
    pub level: LevelFilter,
}

pub const LOG_FILES: [LogFile; 3] = [
    LogFile {
        name: "error.log",
        level: LevelFilter::ERROR,
    },
    LogFile {
        name: "info.log",
        level: LevelFilter::INFO,
    },
    LogFile {
        name: "verbose.log",
        level: LevelFilter::DEBUG,
    },
];

/// Install the global subscriber.
///
/// The console honours `RUST_LOG` (default `info`). With a `log_dir`, each
/// entry of [`LOG_FILES`] gets its own file there. The returned guards flush
/// the file writers when dropped, so keep them alive until exit.
pub fn init_tracing(
    format: LogFormat,
    log_dir: Option<&Path>,
) -> Result<Vec<WorkerGuard>, AppError> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let mut layers = vec![fmt_layer(format, std::io::stdout, true)
        .with_filter(console_filter)
        .boxed()];
    let mut guards = Vec::new();

    if let Some(dir) = log_dir {
        for file in LOG_FILES {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(dir, file.name)?);
            layers.push(
                fmt_layer(format, writer, false)
                    .with_filter(file_filter(file.level))
                    .boxed(),
            );
            guards.push(guard);
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    Ok(guards)
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(ansi)
            .boxed(),
        LogFormat::Pretty => fmt::layer().with_writer(writer).with_ansi(ansi).boxed(),
    }
}

/// Our events down to `level`; dependencies never below info.
fn file_filter(level: LevelFilter) -> Targets {
    Targets::new()
        .with_target(CRATE_TARGET, level)
        .with_default(std::cmp::min(level, LevelFilter::INFO))
}

fn open_log_file(dir: &Path, name: &str) -> Result<RollingFileAppender, AppError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .map_err(|e| {
            AppError::Logging(format!("cannot open {}: {}", dir.join(name).display(), e))
        })
}
