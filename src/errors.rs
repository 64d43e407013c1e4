//! Typed error definitions for preserve.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Several source files that would land on the same destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub destination: PathBuf,
    pub sources: Vec<PathBuf>,
}

#[derive(Debug, Error)]
pub enum PreserveError {
    #[error("{0}")]
    Config(String),

    #[error("Duplicate filenames detected: {}", format_groups(.0))]
    DuplicateFiles(Vec<DuplicateGroup>),

    #[error("Files clobbered: {}", join_paths(.0))]
    ClobberingFiles(Vec<PathBuf>),

    #[error("{} does not exist", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Unrecognized manifest format: {}", .0.display())]
    UnknownManifestFormat(PathBuf),

    #[error("{}:{line}: {reason}", path.display())]
    ManifestParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{op} '{}'", path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PreserveError {
    /// Stable identifier used as the `kind` field in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PreserveError::Config(_) => "config",
            PreserveError::DuplicateFiles(_) => "duplicate_files",
            PreserveError::ClobberingFiles(_) => "clobbering_files",
            PreserveError::ManifestNotFound(_) => "manifest_not_found",
            PreserveError::UnknownManifestFormat(_) => "unknown_manifest_format",
            PreserveError::ManifestParse { .. } => "manifest_parse",
            PreserveError::Filesystem { .. } => "filesystem",
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        PreserveError::Config(msg.into())
    }
}

fn format_groups(groups: &[DuplicateGroup]) -> String {
    let mut s = String::new();
    for group in groups {
        let _ = write!(s, "\n  {} <=", group.destination.display());
        for src in &group.sources {
            let _ = write!(s, "\n    {}", src.display());
        }
    }
    s
}

fn join_paths(paths: &[PathBuf]) -> String {
    let mut s = String::new();
    for p in paths {
        let _ = write!(s, "\n  {}", p.display());
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clobber_message_lists_every_path() {
        let err = PreserveError::ClobberingFiles(vec![
            PathBuf::from("/out/book/book-001_a.txt"),
            PathBuf::from("/out/book/book-002_b.txt"),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("Files clobbered:"));
        assert!(msg.contains("book-001_a.txt"));
        assert!(msg.contains("book-002_b.txt"));
        assert_eq!(err.kind(), "clobbering_files");
    }

    #[test]
    fn duplicate_message_names_destination_and_sources() {
        let err = PreserveError::DuplicateFiles(vec![DuplicateGroup {
            destination: PathBuf::from("/out/a/a-1_x.txt"),
            sources: vec![PathBuf::from("/src/one/a-1_x.txt"), PathBuf::from("/src/two/a-1_x.txt")],
        }]);
        let msg = err.to_string();
        assert!(msg.contains("/out/a/a-1_x.txt"));
        assert!(msg.contains("/src/one/a-1_x.txt"));
        assert!(msg.contains("/src/two/a-1_x.txt"));
    }
}
