//! Telemetry setup
//!
//! `LOG_LEVEL` drives the default filter (RUST_LOG wins when set),
//! `LOG_FORMAT` picks json or text output, `LOG_FILE` adds a non-blocking
//! file writer. The returned guard must be held for the process lifetime.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

pub fn init_telemetry(level: &str, format: &str, log_file: Option<&str>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_lowercase()));

    let json = format.eq_ignore_ascii_case("json");
    let mut guard = None;

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match log_file {
        Some(path) => {
            let appender = tracing_appender::rolling::never(".", path);
            let (writer, g) = tracing_appender::non_blocking(appender);
            guard = Some(g);
            if json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_writer(writer).with_ansi(false).boxed()
            }
        }
        None => {
            if json {
                fmt::layer().json().boxed()
            } else {
                fmt::layer().boxed()
            }
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    guard
}
