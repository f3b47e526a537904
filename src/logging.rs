//! Logging Setup
//!
//! Console output plus, when a log directory is configured, two JSON files:
//! `combined.log` with every event that passes the filter and `error.log`
//! with error events only.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::config::LogFormat;

pub const COMBINED_LOG: &str = "combined.log";
pub const ERROR_LOG: &str = "error.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber.
///
/// The returned guards flush the file writers when dropped, so `main` must
/// hold them until shutdown.
pub fn init(format: LogFormat, log_dir: Option<&Path>) -> Vec<WorkerGuard> {
    // RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "item_service=info,tower_http=info".into());

    let console: BoxedLayer = match format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().boxed(),
    };
    let mut layers = vec![console];

    let guards = match log_dir {
        Some(dir) => {
            let (file_layers, guards) = file_layers(dir);
            layers.extend(file_layers);
            guards
        }
        None => Vec::new(),
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .init();
    guards
}

/// JSON file sinks under `dir`, each behind a non-blocking writer.
pub fn file_layers(dir: &Path) -> (Vec<BoxedLayer>, Vec<WorkerGuard>) {
    let (combined, combined_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, COMBINED_LOG));
    let (errors, errors_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, ERROR_LOG));

    let layers = vec![
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(combined)
            .boxed(),
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(errors)
            .with_filter(LevelFilter::ERROR)
            .boxed(),
    ];
    (layers, vec![combined_guard, errors_guard])
}
