use crate::config::LoggingConfig;
use std::io::IsTerminal;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{fmt, util::SubscriberInitExt, Layer};

// ================= level helpers =================

fn parse_tracing_level(s: &str) -> Option<tracing::Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

fn level_filter(s: &str, fallback: LevelFilter) -> LevelFilter {
    if s.trim().is_empty() {
        return fallback;
    }
    parse_tracing_level(s)
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::OFF)
}

// ================= rotating writer for files =================

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.0.clone())
    }
}

#[derive(Clone)]
struct RotWriterHandle(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file writer poisoned"))?
            .write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file writer poisoned"))?
            .flush()
    }
}

// ================= path helpers =================

fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer(
    cfg: &LoggingConfig,
    base_dir: &Path,
) -> Result<Option<RotWriter>, Box<dyn std::error::Error + Send + Sync>> {
    if cfg.file.trim().is_empty() {
        return Ok(None);
    }

    let log_path = resolve_log_path(&cfg.file, base_dir);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = cfg.max_size_mb.unwrap_or(100) as usize * 1024 * 1024;

    // Respect retention policy: prefer MaxFiles if provided, else Age
    let age = chrono::Duration::days(cfg.max_age_days.unwrap_or(1) as i64);
    let limit = if let Some(n) = cfg.max_backups {
        FileLimit::MaxFiles(n)
    } else {
        FileLimit::Age(age)
    };

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        None,
    );

    Ok(Some(RotWriter(Arc::new(Mutex::new(rot)))))
}

// ================= public init =================

/// Install the global subscriber: console (human-friendly) plus an optional JSON file sink.
///
/// `RUST_LOG`, when set, caps both sinks. Calling this more than once keeps the first
/// subscriber.
pub fn init_logging(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

    // Bridge `log` → `tracing` *before* installing the subscriber
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("LogTracer init skipped: {e}");
    }

    let env: Option<EnvFilter> = EnvFilter::try_from_default_env().ok();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_filter(level_filter(&cfg.console_level, LevelFilter::INFO));

    let file_writer = match create_rotating_writer(cfg, base_dir) {
        Ok(writer) => writer,
        Err(e) => {
            eprintln!("Failed to initialize log file '{}': {e}", cfg.file);
            None
        }
    };
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_writer(writer)
            .with_filter(level_filter(&cfg.file_level, LevelFilter::INFO))
    });

    let subscriber = Registry::default()
        .with(env)
        .with(console_layer)
        .with(file_layer);

    let _ = subscriber.try_init();
}
