// Logging setup: human-readable console output plus optional JSON log file
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use eyre::{Result, WrapErr};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

const CRATE_TARGET: &str = "wallet_swap_counter";

// Keeps the non-blocking file writer alive for the whole process
static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Third-party crates log at `warn`, this crate at the given level.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("warn,{}={}", CRATE_TARGET, level))
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{}=info", CRATE_TARGET)))
}

pub fn init_logging(bin_name: &str) -> Result<()> {
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let log_to_file = env::var("LOG_TO_FILE").map(|v| v == "true").unwrap_or(false);

    // Console goes to stderr so the report on stdout stays clean
    let console_layer = fmt::Layer::new()
        .pretty()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(build_filter(&console_log_level));

    if log_to_file {
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let log_dir = Path::new("logs");
        fs::create_dir_all(log_dir).wrap_err("Failed to create log directory")?;
        let file_name = format!("{}_{}.log", bin_name, timestamp);

        let file_appender = tracing_appender::rolling::never(log_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok();

        // Structured JSON with UTC timestamps; span close events carry timing
        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(non_blocking)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(build_filter(&file_log_level));

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .wrap_err("Failed to install tracing subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .wrap_err("Failed to install tracing subscriber")?;
    }

    Ok(())
}
