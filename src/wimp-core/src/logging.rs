//! Log setup for the one-shot plugin process.
//!
//! Stdout belongs to the host protocol (listings, resolved URLs), so console
//! logging goes to stderr and the main sink is a daily rolling file.

use crate::{config::LoggingConfig, paths::AppDirs};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILE_STEM: &str = "wimp.log";

/// Keeps the file writer alive; logs written after drop are lost.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber. `RUST_LOG` directives are layered on top of
/// the configured level.
pub fn init_logging(config: &LoggingConfig, dirs: &AppDirs) -> Result<LoggingGuard, LoggingError> {
    let log_dir = dirs.log_dir();
    fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDirectory {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let file_stem = config.file_name.as_deref().unwrap_or(DEFAULT_FILE_STEM);
    let removed = prune_rotated_logs(log_dir, file_stem, config.max_log_files.max(1))?;

    let (file, file_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, file_stem));
    let writer = if config.stdout {
        BoxMakeWriter::new(std::io::stderr.and(file))
    } else {
        BoxMakeWriter::new(file)
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(config.level).into())
        .from_env_lossy();

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(LoggingError::SubscriberInstall)?;

    tracing::debug!(dir = %log_dir.display(), removed, "logging ready");
    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Keep the `keep` most recently modified files starting with `file_stem`.
/// Returns how many were deleted.
fn prune_rotated_logs(dir: &Path, file_stem: &str, keep: usize) -> Result<usize, LoggingError> {
    let listing = fs::read_dir(dir).map_err(|source| LoggingError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut rotated: Vec<(SystemTime, PathBuf)> = listing
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(file_stem))
        .filter_map(|entry| {
            let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, entry.path()))
        })
        .collect();

    // Newest first; everything past `keep` goes.
    rotated.sort_by(|a, b| b.0.cmp(&a.0));
    let stale = rotated.split_off(keep.min(rotated.len()));
    for (_, path) in &stale {
        fs::remove_file(path).map_err(|source| LoggingError::Cleanup {
            path: path.clone(),
            source,
        })?;
    }
    Ok(stale.len())
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("a global tracing subscriber is already installed: {0}")]
    SubscriberInstall(Box<dyn std::error::Error + Send + Sync>),
    #[error("cannot list log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot remove old log file {path}: {source}")]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
}
