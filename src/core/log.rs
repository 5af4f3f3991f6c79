// Process-wide logging, initialized once from main
use anyhow::{Context, Result};
use std::{
    fs::{self, File, OpenOptions},
    path::Path,
    sync::Arc,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Console output stays at warnings unless `verbose`; the log file, when
/// given, always keeps the app's info lines.
pub fn init_logging(verbose: bool, log_path: Option<&Path>) {
    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::WARN, "warn")
    };
    let app_filter = Targets::new()
        .with_target("xfx", level_filter)
        .with_default(LevelFilter::WARN);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file, file_error) = match log_path.map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let file_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_filter(
                Targets::new()
                    .with_target("xfx", file_level)
                    .with_default(LevelFilter::WARN),
            )
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .without_time()
                .with_filter(app_filter)
                .with_filter(env_filter),
        )
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("Logging to console only: {e:#}");
    }
}

/// Opens `path` for appending, creating it and its directory if needed.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
