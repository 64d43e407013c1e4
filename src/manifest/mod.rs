//! Manifests: listings of (path, size) assets from backup catalogs, file
//! analyzers, or this tool's own inventory.
//!
//! Each physical encoding is one [`ManifestFormat`] adapter. [`Manifest::load`]
//! picks the adapter and produces a uniform [`Manifest`]; nothing downstream
//! knows which format a manifest came from.

mod analyzer;
mod inventory;
mod tsm;

pub use analyzer::Analyzer;
pub use inventory::{Inventory, write_inventory};
pub use tsm::TsmBackup;

use anyhow::Result;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::errors::PreserveError;
use crate::fs_ops::io_error_with_help;

/// One listed file, path as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: PathBuf,
    pub bytes: u64,
}

/// A manifest-relative asset. Ordering is by path, then size.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManifestEntry {
    pub relpath: String,
    pub bytes: u64,
}

pub type AssetSet = BTreeSet<ManifestEntry>;

/// What an adapter extracts from a manifest file.
#[derive(Debug, Clone, Default)]
pub struct ParsedManifest {
    /// Root declared by the manifest itself, if the format carries one.
    pub root: Option<PathBuf>,
    pub assets: Vec<Asset>,
}

/// One physical manifest encoding.
pub trait ManifestFormat {
    fn name(&self) -> &'static str;

    /// Whether this adapter should handle `path`, given its full `content`.
    fn sniff(&self, path: &Path, content: &str) -> bool;

    fn parse(&self, path: &Path, content: &str) -> Result<ParsedManifest, PreserveError>;
}

/// Adapters in detection order.
pub fn formats() -> [&'static dyn ManifestFormat; 3] {
    [&Analyzer, &Inventory, &TsmBackup]
}

#[derive(Debug, Clone)]
pub struct Manifest {
    origin: PathBuf,
    format: &'static str,
    root: Option<PathBuf>,
    assets: Vec<Asset>,
}

impl Manifest {
    /// Read `path`, detect its format and parse it.
    pub fn load(path: &Path) -> Result<Self> {
        if fs::symlink_metadata(path).is_err() {
            return Err(PreserveError::ManifestNotFound(path.to_path_buf()).into());
        }
        let content = fs::read_to_string(path).map_err(io_error_with_help("read manifest", path))?;
        let format = formats()
            .into_iter()
            .find(|f| f.sniff(path, &content))
            .ok_or_else(|| PreserveError::UnknownManifestFormat(path.to_path_buf()))?;
        let parsed = format.parse(path, &content)?;
        let manifest = Self::from_parsed(path, format.name(), parsed);
        debug!(
            path = %path.display(),
            format = manifest.format,
            root = ?manifest.root,
            assets = manifest.assets.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    pub fn from_parsed(origin: &Path, format: &'static str, parsed: ParsedManifest) -> Self {
        Self {
            origin: origin.to_path_buf(),
            format,
            root: parsed.root,
            assets: parsed.assets,
        }
    }

    /// File the manifest was read from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn format(&self) -> &'static str {
        self.format
    }

    /// Root declared by the manifest itself, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    /// All assets as (path relative to root, bytes). The declared root wins
    /// over `shared_root`. Paths outside the root are kept as listed.
    pub fn asset_set(&self, shared_root: &Path) -> AssetSet {
        let root = self.root().unwrap_or(shared_root);
        self.assets
            .iter()
            .map(|a| ManifestEntry {
                relpath: relative_to(&a.path, root),
                bytes: a.bytes,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

/// Root used for every manifest that declares none: the deepest directory
/// containing all of their assets together. Listings of one tree, subsets
/// included, must resolve to the same relative paths.
pub fn shared_root(manifests: &[Manifest]) -> PathBuf {
    common_root(
        manifests
            .iter()
            .filter(|m| m.root.is_none())
            .flat_map(|m| m.assets.iter().map(|a| a.path.as_path())),
    )
}

/// Deepest directory containing every path. Empty for no paths.
pub fn common_root<'a>(paths: impl IntoIterator<Item = &'a Path>) -> PathBuf {
    let mut common: Option<Vec<Component<'a>>> = None;
    for path in paths {
        let dir: Vec<Component<'a>> = path.parent().map(|p| p.components().collect()).unwrap_or_default();
        common = Some(match common {
            None => dir,
            Some(prev) => prev
                .into_iter()
                .zip(dir)
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }
    common.map(|c| c.iter().collect()).unwrap_or_default()
}

/// `path` relative to `root`, `/`-separated.
fn relative_to(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(p: &str, bytes: u64) -> Asset {
        Asset {
            path: PathBuf::from(p),
            bytes,
        }
    }

    fn rootless(origin: &str, assets: Vec<Asset>) -> Manifest {
        Manifest::from_parsed(Path::new(origin), "test", ParsedManifest { root: None, assets })
    }

    #[test]
    fn common_root_is_deepest_shared_directory() {
        let paths = [Path::new("/data/books/a/x.txt"), Path::new("/data/books/b/y.txt")];
        assert_eq!(common_root(paths), PathBuf::from("/data/books"));
        assert_eq!(common_root([Path::new("/a/x"), Path::new("/b/y")]), PathBuf::from("/"));
        assert_eq!(common_root(std::iter::empty()), PathBuf::new());
    }

    #[test]
    fn shared_root_spans_every_rootless_manifest() {
        let full = rootless("full", vec![asset("/fs/x/a/one.txt", 1), asset("/fs/x/b/two.txt", 2)]);
        let part = rootless("part", vec![asset("/fs/x/a/one.txt", 1)]);
        let declared = Manifest::from_parsed(
            Path::new("inv"),
            "test",
            ParsedManifest { root: Some(PathBuf::from("/data")), assets: vec![asset("/data/a/one.txt", 1)] },
        );
        let ms = [full, part, declared];
        let root = shared_root(&ms);
        assert_eq!(root, PathBuf::from("/fs/x"));

        let expected = ManifestEntry { relpath: "a/one.txt".into(), bytes: 1 };
        assert!(ms[1].asset_set(&root).contains(&expected));
        assert!(ms[2].asset_set(&root).contains(&expected));
    }

    #[test]
    fn asset_set_is_relative_to_root() {
        let m = Manifest::from_parsed(
            Path::new("m.csv"),
            "test",
            ParsedManifest {
                root: Some(PathBuf::from("/data")),
                assets: vec![asset("/data/a/b.txt", 5), asset("/elsewhere/c.txt", 1)],
            },
        );
        let set: Vec<_> = m.asset_set(Path::new("/ignored")).into_iter().collect();
        assert_eq!(
            set,
            vec![
                ManifestEntry { relpath: "/elsewhere/c.txt".into(), bytes: 1 },
                ManifestEntry { relpath: "a/b.txt".into(), bytes: 5 },
            ]
        );
    }

    #[test]
    fn missing_manifest_is_reported_as_not_found() {
        let err = Manifest::load(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.downcast_ref::<PreserveError>().unwrap().kind(), "manifest_not_found");
    }
}
