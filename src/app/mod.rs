//! Application orchestrators for the two binaries.
//! Each loads and merges config, initializes logging, runs its flow and
//! logs a structured record of any failure before handing it back to `main`.

pub mod manifest;
pub mod partition;

use anyhow::Result;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;

use crate::cli::LogArgs;
use crate::config::{Config, load_config};
use crate::errors::PreserveError;
use crate::logging::init_tracing;
use crate::output as out;

/// Load config, apply CLI overrides, start logging. The guard must be held
/// until exit so file logs are flushed.
fn setup(log: &LogArgs, overrides: impl FnOnce(&mut Config)) -> Result<(Config, Option<WorkerGuard>)> {
    let mut cfg = load_config()?;
    overrides(&mut cfg);
    let guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), log.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;
    Ok((cfg, guard))
}

/// Emit one structured error event for a failed run.
fn log_failure(e: &anyhow::Error, what: &str) {
    match e.downcast_ref::<PreserveError>() {
        Some(PreserveError::DuplicateFiles(groups)) => {
            error!(kind = "duplicate_files", groups = groups.len(), "{what} failed")
        }
        Some(PreserveError::ClobberingFiles(paths)) => {
            error!(kind = "clobbering_files", count = paths.len(), "{what} failed")
        }
        Some(PreserveError::ManifestNotFound(path)) => {
            error!(kind = "manifest_not_found", path = %path.display(), "{what} failed")
        }
        Some(PreserveError::Filesystem { op, path, source }) => {
            error!(kind = "filesystem", op, path = %path.display(), error = %source, "{what} failed")
        }
        Some(pe) => error!(kind = pe.kind(), error = %pe, "{what} failed"),
        None => error!(error = ?e, "{what} failed"),
    }
}
