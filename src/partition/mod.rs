//! Partition planning and execution.
//!
//! A run goes `PartitionMapping -> ValidatedMapping -> execute(mode) -> PartitionReport`.
//! Only a mapping that passed both the duplicate and the clobber check can be
//! executed, so no file is touched unless the whole plan is safe.

mod checks;
mod execute;

pub use checks::{ValidatedMapping, find_clobbered, has_duplicates, validate};
pub use execute::{PartitionReport, execute};

use clap::ValueEnum;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// What to do with each planned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PartitionMode {
    /// Print the plan only
    #[default]
    #[value(name = "dryrun")]
    DryRun,
    /// Copy files, keeping the originals
    Copy,
    /// Move files
    Move,
}

impl fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PartitionMode::DryRun => "dryrun",
            PartitionMode::Copy => "copy",
            PartitionMode::Move => "move",
        })
    }
}

/// Ordered source -> destination pairs. Each source appears once; pushing a
/// source again replaces its destination in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionMapping {
    pairs: Vec<(PathBuf, PathBuf)>,
    index: HashMap<PathBuf, usize>,
}

impl PartitionMapping {
    pub fn push(&mut self, source: PathBuf, destination: PathBuf) {
        if let Some(&i) = self.index.get(&source) {
            self.pairs[i].1 = destination;
            return;
        }
        self.index.insert(source.clone(), self.pairs.len());
        self.pairs.push((source, destination));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, source: &Path) -> Option<&Path> {
        self.index.get(source).map(|&i| self.pairs[i].1.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> + '_ {
        self.pairs.iter().map(|(s, d)| (s.as_path(), d.as_path()))
    }

    pub fn sources(&self) -> impl Iterator<Item = &Path> + '_ {
        self.pairs.iter().map(|(s, _)| s.as_path())
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Path> + '_ {
        self.pairs.iter().map(|(_, d)| d.as_path())
    }
}

impl FromIterator<(PathBuf, PathBuf)> for PartitionMapping {
    fn from_iter<I: IntoIterator<Item = (PathBuf, PathBuf)>>(iter: I) -> Self {
        let mut mapping = PartitionMapping::default();
        for (s, d) in iter {
            mapping.push(s, d);
        }
        mapping
    }
}

/// Result of `FileSet::partition_by`.
#[derive(Debug, Clone, Default)]
pub struct PartitionPlan {
    pub mapping: PartitionMapping,
    /// Files whose names did not match the pattern; never executed.
    pub unmatched: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_keeps_insertion_order_and_unique_sources() {
        let mapping: PartitionMapping = [
            (PathBuf::from("/s/b"), PathBuf::from("/d/1")),
            (PathBuf::from("/s/a"), PathBuf::from("/d/2")),
            (PathBuf::from("/s/b"), PathBuf::from("/d/3")),
        ]
        .into_iter()
        .collect();

        assert_eq!(mapping.len(), 2);
        let sources: Vec<_> = mapping.sources().collect();
        assert_eq!(sources, vec![Path::new("/s/b"), Path::new("/s/a")]);
        assert_eq!(mapping.get(Path::new("/s/b")), Some(Path::new("/d/3")));
    }

    #[test]
    fn mode_names_match_cli_values() {
        for mode in [PartitionMode::DryRun, PartitionMode::Copy, PartitionMode::Move] {
            let parsed = PartitionMode::from_str(&mode.to_string(), false).unwrap();
            assert_eq!(parsed, mode);
        }
        assert_eq!(PartitionMode::default(), PartitionMode::DryRun);
    }
}
