//! Cross-manifest comparison: what every manifest shares, and what each one
//! has on its own.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::PreserveError;
use crate::manifest::{AssetSet, Manifest, shared_root};

/// Entries unique to one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDiff {
    pub origin: PathBuf,
    /// Sorted by (relative path, bytes).
    pub unique: AssetSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Root applied to manifests that declare none.
    pub shared_root: PathBuf,
    pub common: AssetSet,
    /// One per manifest, in input order.
    pub manifests: Vec<ManifestDiff>,
}

/// Load every manifest, refusing to start if any path is missing.
pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Manifest>> {
    if let Some(missing) = paths.iter().map(AsRef::as_ref).find(|p| !p.exists()) {
        return Err(PreserveError::ManifestNotFound(missing.to_path_buf()).into());
    }
    paths.iter().map(|p| Manifest::load(p.as_ref())).collect()
}

/// Intersect all manifests and diff each against the intersection.
pub fn compare(manifests: &[Manifest]) -> Result<Comparison> {
    let shared_root = shared_root(manifests);
    let sets: Vec<AssetSet> = manifests.iter().map(|m| m.asset_set(&shared_root)).collect();
    let Some((first, rest)) = sets.split_first() else {
        return Err(PreserveError::config("at least one manifest is required").into());
    };

    let common: AssetSet = first
        .iter()
        .filter(|e| rest.iter().all(|s| s.contains(e)))
        .cloned()
        .collect();

    let manifests: Vec<ManifestDiff> = manifests
        .iter()
        .zip(&sets)
        .map(|(m, set)| ManifestDiff {
            origin: m.origin().to_path_buf(),
            unique: set.difference(&common).cloned().collect(),
        })
        .collect();

    info!(
        manifests = manifests.len(),
        common = common.len(),
        shared_root = %shared_root.display(),
        "comparison complete"
    );
    Ok(Comparison {
        shared_root,
        common,
        manifests,
    })
}

/// Render the comparison as report lines.
pub fn report_lines(cmp: &Comparison) -> Vec<String> {
    let mut lines = vec![format!(
        "{} values are common to all the supplied files:",
        cmp.common.len()
    )];
    for (n, diff) in cmp.manifests.iter().enumerate() {
        lines.push(format!(
            " => Path {}: {} values are unique to {}",
            n + 1,
            diff.unique.len(),
            diff.origin.display()
        ));
        for (i, entry) in diff.unique.iter().enumerate() {
            lines.push(format!("     ({}) {} -- {} bytes", i + 1, entry.relpath, entry.bytes));
        }
    }
    lines
}
