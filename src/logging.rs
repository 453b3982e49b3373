use crate::error::ConfigError;
use crate::models::Configuration;
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup logging as configured by the `echo` and `log` flags.
///
/// - `log`: one file per run, `<logs_prefix><timestamp><logs_suffix>` in `logs_dir`
/// - `echo`: console output on stderr
///
/// # Arguments
/// * `config` - Configuration supplying the flags, log directory and file naming
/// * `debug_mode` - If true, use debug level; otherwise use info level
///
/// # Returns
/// A guard that must be held for the duration of the program to keep file
/// logging active, or `None` when file logging is off
pub fn setup_logging(config: &Configuration, debug_mode: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = if debug_mode {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let (file_layer, guard) = if config.log {
        let logs_dir = config.logs_dir().context("Failed to resolve logs directory")?;
        let appender = log_file_appender(logs_dir, &config.logs_prefix, &config.logs_suffix)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false) // No ANSI codes in log files
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let console_layer = config.echo.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        "Logging initialized: log={}, echo={}, debug={}",
        config.log,
        config.echo,
        debug_mode
    );

    Ok(guard)
}

/// End the run on a fatal error with exit status 1.
///
/// The error is logged, and printed to stderr directly when the console
/// layer is off. `guard` is dropped before exiting so the file log is
/// flushed.
pub fn exit_fatal(err: &ConfigError, echo: bool, guard: Option<WorkerGuard>) -> ! {
    tracing::error!("{}", err);
    if !echo {
        eprintln!("{err}");
    }
    drop(guard);
    std::process::exit(1);
}

/// Non-rotating appender for this run's log file, creating `logs_dir` if needed.
fn log_file_appender(logs_dir: &Utf8Path, prefix: &str, suffix: &str) -> Result<RollingFileAppender> {
    if !logs_dir.exists() {
        fs::create_dir_all(logs_dir)
            .with_context(|| format!("Failed to create log directory: {}", logs_dir))?;
    }

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(format!("{prefix}{stamp}"));

    // The appender joins prefix and suffix with a '.'
    let extension = suffix.trim_start_matches('.');
    if !extension.is_empty() {
        builder = builder.filename_suffix(extension);
    }

    builder
        .build(logs_dir)
        .with_context(|| format!("Failed to open log file in {}", logs_dir))
}
