use mdbatch_core::config::types::LoggingConfig;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// HTTP client chatter stays out of the log unless `RUST_LOG` asks for it.
const QUIET_DEPENDENCIES: &[&str] = &["ureq=warn", "rustls=warn"];

static LOG_GUARD: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> =
    Mutex::new(None);

/// Install the stderr layer and, when `cfg.file` is set, a plain-text file
/// layer that appends across runs.
pub fn init(cfg: &LoggingConfig) {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(filter_for(parse_level(&cfg.level).unwrap_or(LevelFilter::INFO)));

    let registry = tracing_subscriber::registry().with(stderr_layer);

    let Some(path) = cfg.file.as_deref() else {
        registry.init();
        return;
    };

    let file = open_log_file(path).unwrap_or_else(|e| {
        eprintln!("Failed to open log file {}: {}", path.display(), e);
        std::process::exit(1);
    });
    let (writer, guard) = tracing_appender::non_blocking(file);
    if let Ok(mut g) = LOG_GUARD.lock() {
        *g = Some(guard);
    }

    let file_level = cfg
        .file_level
        .as_deref()
        .and_then(parse_level)
        .or_else(|| parse_level(&cfg.level))
        .unwrap_or(LevelFilter::DEBUG);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter_for(file_level));

    registry.with(file_layer).init();
}

/// `level` for everything, dependencies quietened, then `RUST_LOG` on top.
fn filter_for(level: LevelFilter) -> EnvFilter {
    let mut filter = EnvFilter::builder().with_default_directive(level.into()).parse_lossy("");
    for directive in QUIET_DEPENDENCIES {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        for directive in env.split(',').filter_map(|d| d.trim().parse().ok()) {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}
