use std::{env, error::Error, io};

use tracing_appender::{
    non_blocking::NonBlocking,
    rolling::{Builder, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{ConfigPaths, LogLevel};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const DAYS_TO_KEEP: usize = 7;

fn wants_json() -> bool {
    env::var("PULSELINK_LOG_FORMAT").is_ok_and(|format| format == "json")
}

fn console_layer(json: bool) -> BoxedLayer {
    let layer = fmt::layer().with_writer(io::stderr).with_level(true);
    if json {
        layer.json().with_target(true).boxed()
    } else {
        layer
            .compact()
            .with_target(false)
            .with_thread_names(true)
            .boxed()
    }
}

fn file_layer(json: bool, writer: NonBlocking) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);
    if json {
        layer.json().boxed()
    } else {
        layer
            .compact()
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed()
    }
}

fn install(default_level: LogLevel, layers: Vec<BoxedLayer>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter()));

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;
    Ok(())
}

/// Initialize tracing on stderr
///
/// `RUST_LOG` wins over `default_level`. `PULSELINK_LOG_FORMAT=json`
/// switches to JSON lines. Stdout is left to command output.
///
/// # Errors
/// Returns error if a global subscriber is already set
pub fn init(default_level: LogLevel) -> Result<(), Box<dyn Error>> {
    install(default_level, vec![console_layer(wants_json())])
}

/// Initialize tracing on stderr and a daily log file
///
/// Files go to [`ConfigPaths::log_dir`] and the last week is kept.
///
/// # Errors
/// Returns error if the log directory cannot be created or a global
/// subscriber is already set
pub fn init_with_file(default_level: LogLevel) -> Result<(), Box<dyn Error>> {
    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("pulselink")
        .filename_suffix("log")
        .build(ConfigPaths::log_dir()?)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let json = wants_json();
    install(
        default_level,
        vec![console_layer(json), file_layer(json, writer)],
    )?;

    // The writer thread must outlive main.
    std::mem::forget(guard);
    Ok(())
}
