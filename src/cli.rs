//! CLI definitions for the `partition` and `preserve` binaries.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Flags override values from the XML config file.

use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{Config, LogLevel};
use crate::partition::PartitionMode;

/// Logging flags shared by both binaries.
#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(
        long,
        global = true,
        value_parser = LogLevel::from_str,
        help = "Set log level: quiet, normal, info, debug"
    )]
    pub log_level: Option<LogLevel>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl LogArgs {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.clone()
    }

    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
    }
}

/// Partition a tree of files into per-key subdirectories.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "partition",
    version,
    about = "Partition a tree of files based on a filename pattern"
)]
pub struct PartitionArgs {
    /// Root directory to be partitioned.
    #[arg(value_hint = ValueHint::DirPath)]
    pub source: PathBuf,

    /// Output directory.
    #[arg(value_hint = ValueHint::DirPath)]
    pub destination: PathBuf,

    /// Dryrun, move, or copy files to destination.
    #[arg(short, long, value_enum, default_value_t = PartitionMode::DryRun)]
    pub mode: PartitionMode,

    /// Regex with two capture groups: partition key and numeric id.
    #[arg(short, long, value_name = "REGEX")]
    pub pattern: Option<String>,

    #[command(flatten)]
    pub log: LogArgs,
}

impl PartitionArgs {
    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        self.log.apply_overrides(cfg);
        if let Some(p) = &self.pattern {
            cfg.pattern = p.clone();
        }
    }
}

/// Work with asset manifests.
#[derive(Parser, Debug, Clone)]
#[command(name = "preserve", version, about = "Compare and produce asset manifests")]
pub struct PreserveArgs {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check for the presence of files across manifests of various formats.
    Compare {
        /// First manifest.
        #[arg(value_hint = ValueHint::FilePath)]
        first: PathBuf,
        /// Further manifests.
        #[arg(value_hint = ValueHint::FilePath)]
        other: Vec<PathBuf>,
    },
    /// Write an inventory manifest of a directory tree.
    Inventory {
        /// Directory to inventory.
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
        /// Output file (stdout when omitted); never overwritten.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

pub fn parse_partition() -> PartitionArgs {
    PartitionArgs::parse()
}

pub fn parse_preserve() -> PreserveArgs {
    PreserveArgs::parse()
}
