//! Safety checks run before any file is written.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::PartitionMapping;
use crate::errors::{DuplicateGroup, PreserveError};

/// Group sources by destination and return every group with more than one
/// source, or `None` when all destinations are distinct.
///
/// Groups follow first-seen destination order; sources keep mapping order.
pub fn has_duplicates(mapping: &PartitionMapping) -> Option<Vec<DuplicateGroup>> {
    let mut order: Vec<&Path> = Vec::new();
    let mut by_dest: HashMap<&Path, Vec<&Path>> = HashMap::new();
    for (source, dest) in mapping.iter() {
        by_dest
            .entry(dest)
            .or_insert_with(|| {
                order.push(dest);
                Vec::new()
            })
            .push(source);
    }

    let groups: Vec<DuplicateGroup> = order
        .into_iter()
        .filter_map(|dest| {
            let sources = &by_dest[dest];
            (sources.len() > 1).then(|| DuplicateGroup {
                destination: dest.to_path_buf(),
                sources: sources.iter().map(|s| s.to_path_buf()).collect(),
            })
        })
        .collect();

    if groups.is_empty() { None } else { Some(groups) }
}

/// Every destination that already exists on disk (files, directories and
/// dangling symlinks alike), in mapping order.
pub fn find_clobbered(mapping: &PartitionMapping) -> Vec<PathBuf> {
    mapping
        .destinations()
        .filter(|d| fs::symlink_metadata(d).is_ok())
        .map(Path::to_path_buf)
        .collect()
}

/// A mapping that passed both checks. Only obtainable through [`validate`].
#[derive(Debug)]
pub struct ValidatedMapping<'a> {
    mapping: &'a PartitionMapping,
}

impl<'a> ValidatedMapping<'a> {
    pub fn mapping(&self) -> &'a PartitionMapping {
        self.mapping
    }
}

/// Run the duplicate check, then the clobber check, over the whole mapping.
pub fn validate(mapping: &PartitionMapping) -> Result<ValidatedMapping<'_>> {
    if let Some(groups) = has_duplicates(mapping) {
        error!(groups = groups.len(), "duplicate destinations detected");
        return Err(PreserveError::DuplicateFiles(groups).into());
    }
    debug!(files = mapping.len(), "destination paths are unique");

    let clobbered = find_clobbered(mapping);
    if !clobbered.is_empty() {
        error!(count = clobbered.len(), "destinations already exist");
        return Err(PreserveError::ClobberingFiles(clobbered).into());
    }
    debug!(files = mapping.len(), "no destination exists yet");

    Ok(ValidatedMapping { mapping })
}
