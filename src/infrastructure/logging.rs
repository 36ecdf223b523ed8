//! Logging system configuration and initialization
//!
//! - Console output on stderr, so an export written to stdout stays clean
//! - Optional file output, previous run's file renamed with its timestamp
//! - Optional structured JSON lines
//! - `RUST_LOG` overrides the configured level

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

// Keeps the non-blocking file writer alive for the life of the process
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());
}

/// Local wall-clock timestamps with millisecond precision
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Log directory: the configured one, else `logs/` next to the executable
pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    if let Some(directory) = &config.directory {
        return directory.clone();
    }

    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
        .join("logs")
}

/// Rename an existing log file to `<stem>.<timestamp>.log` so each run starts fresh
fn rotate_existing_log_file(log_dir: &Path, log_file_name: &str) -> Result<Option<PathBuf>> {
    let log_file_path = log_dir.join(log_file_name);
    if !log_file_path.exists() {
        return Ok(None);
    }

    let metadata = std::fs::metadata(&log_file_path).context("Failed to get log file metadata")?;
    let file_time = metadata
        .modified()
        .or_else(|_| metadata.created())
        .unwrap_or_else(|_| std::time::SystemTime::now());
    let datetime: DateTime<Local> = file_time.into();

    let file_stem = log_file_name.trim_end_matches(".log");
    let rotated_path = log_dir.join(format!("{}.{}.log", file_stem, datetime.format("%Y%m%dT%H%M%S")));

    std::fs::rename(&log_file_path, &rotated_path).with_context(|| {
        format!(
            "Failed to rotate log file {} to {}",
            log_file_path.display(),
            rotated_path.display()
        )
    })?;

    Ok(Some(rotated_path))
}

/// Build the level filter, quieting HTTP and HTML internals unless tracing
fn build_env_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut filter = EnvFilter::new(level);
    if !level.to_lowercase().contains("trace") {
        for directive in ["reqwest=info", "hyper=warn", "hyper_util=warn", "h2=warn", "html5ever=warn", "selectors=warn"] {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}

fn file_layer(log_dir: &Path, config: &LoggingConfig) -> Result<BoxedLayer> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    rotate_existing_log_file(log_dir, &config.file_name)?;

    let (file_writer, file_guard) = non_blocking(rolling::never(log_dir, &config.file_name));
    LOG_GUARDS
        .lock()
        .map_err(|_| anyhow!("Log guard registry poisoned"))?
        .push(file_guard);

    let layer = if config.json_format {
        fmt::Layer::new()
            .json()
            .with_writer(file_writer)
            .with_timer(LocalTimeFormatter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .boxed()
    } else {
        fmt::Layer::new()
            .with_writer(file_writer)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
            .with_ansi(false)
            .boxed()
    };
    Ok(layer)
}

fn console_layer(config: &LoggingConfig) -> BoxedLayer {
    if config.json_format {
        fmt::Layer::new()
            .json()
            .with_writer(std::io::stderr)
            .with_timer(LocalTimeFormatter)
            .boxed()
    } else {
        fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
            .boxed()
    }
}

/// Initialize logging with custom configuration
///
/// Fails when no output is enabled or a global subscriber is already set.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.file_output && !config.console_output {
        return Err(anyhow!("No logging output configured"));
    }

    let log_dir = get_log_directory(config);
    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.file_output {
        layers.push(file_layer(&log_dir, config)?);
    }
    if config.console_output {
        layers.push(console_layer(config));
    }

    Registry::default()
        .with(layers)
        .with(build_env_filter(&config.level))
        .try_init()
        .context("Failed to install global subscriber")?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if config.file_output {
        info!("Log file: {:?}", log_dir.join(&config.file_name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(!config.file_output);
    }

    #[test]
    fn test_log_directory_resolution() {
        assert!(get_log_directory(&LoggingConfig::default()).ends_with("logs"));

        let config = LoggingConfig {
            directory: Some(PathBuf::from("/tmp/harvest-logs")),
            ..Default::default()
        };
        assert_eq!(get_log_directory(&config), PathBuf::from("/tmp/harvest-logs"));
    }

    #[test]
    fn rotation_moves_previous_run_aside() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run.log"), "previous run\n").unwrap();

        let rotated = rotate_existing_log_file(dir.path(), "run.log").unwrap().unwrap();

        assert!(!dir.path().join("run.log").exists());
        assert_eq!(std::fs::read_to_string(&rotated).unwrap(), "previous run\n");
        let name = rotated.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("run.") && name.ends_with(".log"));
    }

    #[test]
    fn rotation_without_previous_file_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        assert!(rotate_existing_log_file(dir.path(), "run.log").unwrap().is_none());
    }

    #[test]
    fn refuses_config_without_outputs() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..Default::default()
        };
        assert!(init_logging_with_config(&config).is_err());
    }
}
