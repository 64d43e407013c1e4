//! A snapshot of every regular file under a root, and the partition mapping
//! derived from it.

use anyhow::Result;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::errors::PreserveError;
use crate::fs_ops::io_error_with_help;
use crate::partition::{PartitionMapping, PartitionPlan};

/// One regular file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Files under a root, in walk order, with their total size.
#[derive(Debug, Clone)]
pub struct FileSet {
    root: PathBuf,
    entries: Vec<FileEntry>,
    bytes: u64,
}

impl FileSet {
    /// Recursively enumerate all regular files under `root`.
    ///
    /// Directories are visited with their children sorted by name so repeated
    /// walks of an unchanged tree yield the same order. Symlinks are not followed.
    pub fn from_filesystem(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(PreserveError::config(format!(
                "Source directory not found: {}",
                root.display()
            ))
            .into());
        }

        let mut entries = Vec::new();
        let mut bytes = 0u64;
        for item in WalkDir::new(root).sort_by_file_name() {
            let item = item.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                io_error_with_help("walk", &path)(io::Error::from(e))
            })?;
            if !item.file_type().is_file() {
                continue;
            }
            let meta = item
                .metadata()
                .map_err(|e| io_error_with_help("stat", item.path())(io::Error::from(e)))?;
            trace!(path = %item.path().display(), bytes = meta.len(), "found file");
            bytes += meta.len();
            entries.push(FileEntry {
                path: item.into_path(),
                bytes: meta.len(),
            });
        }

        debug!(root = %root.display(), files = entries.len(), bytes, "file set loaded");
        Ok(Self {
            root: root.to_path_buf(),
            entries,
            bytes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry sizes.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    /// Map each file to `destination_root/<key>/<file name>`.
    ///
    /// Only the file name is matched. Files whose name does not match, or whose
    /// captures are not a lowercase alphabetic key and a numeric id, go to
    /// `unmatched` in input order. Pure: the filesystem is not consulted.
    pub fn partition_by(&self, pattern: &PartitionPattern, destination_root: &Path) -> PartitionPlan {
        let mut mapping = PartitionMapping::default();
        let mut unmatched = Vec::new();

        for entry in &self.entries {
            let name = entry.path.file_name().map(|n| n.to_string_lossy());
            let key = name.as_deref().and_then(|n| pattern.partition_key(n));
            match (key, entry.path.file_name()) {
                (Some(key), Some(file_name)) => {
                    let dest = destination_root.join(key).join(file_name);
                    mapping.push(entry.path.clone(), dest);
                }
                _ => unmatched.push(entry.path.clone()),
            }
        }

        PartitionPlan { mapping, unmatched }
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A compiled partitioning regex with exactly two capture groups:
/// the partition key and the numeric id.
#[derive(Debug, Clone)]
pub struct PartitionPattern {
    regex: Regex,
}

impl PartitionPattern {
    pub fn new(pattern: &str) -> Result<Self, PreserveError> {
        let regex = Regex::new(pattern)
            .map_err(|e| PreserveError::config(format!("Invalid partitioning pattern: {e}")))?;
        // captures_len counts the implicit whole-match group.
        if regex.captures_len() != 3 {
            return Err(PreserveError::config(format!(
                "Partitioning pattern must have exactly two capture groups, found {}: {}",
                regex.captures_len() - 1,
                pattern
            )));
        }
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Partition key for `file_name`, if it matches with a lowercase key and a numeric id.
    pub fn partition_key<'n>(&self, file_name: &'n str) -> Option<&'n str> {
        let caps = self.regex.captures(file_name)?;
        let key = caps.get(1)?.as_str();
        let id = caps.get(2)?.as_str();
        let key_ok = !key.is_empty() && key.bytes().all(|b| b.is_ascii_lowercase());
        let id_ok = !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit());
        (key_ok && id_ok).then_some(key)
    }
}
