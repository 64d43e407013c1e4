//! Core library for `preserve`.
//!
//! Two tools share this crate:
//! - `partition` splits a flat or nested tree of files into per-key
//!   subdirectories derived from each file name, in dry-run, copy or move mode.
//! - `preserve` reads asset manifests in several formats and reports what
//!   they have in common, and writes inventory manifests of local trees.
//!
//! Nothing is ever overwritten: every destination is checked for duplicates
//! and existing files before the first byte moves.

pub mod app;
pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod fileset;
pub mod fs_ops;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod partition;

pub use compare::{Comparison, ManifestDiff, compare, load_all, report_lines};
pub use config::{Config, LogLevel, load_config};
pub use errors::{DuplicateGroup, PreserveError};
pub use fileset::{FileEntry, FileSet, PartitionPattern};
pub use manifest::{AssetSet, Manifest, ManifestEntry};
pub use partition::{PartitionMapping, PartitionMode, PartitionPlan, PartitionReport, execute, validate};
