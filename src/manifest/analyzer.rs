//! File analyzer reports in JSON.
//!
//! Either a bare list of files or an object declaring the scanned root:
//!
//! ```json
//! { "root": "/data", "files": [ { "path": "/data/a.txt", "size": 5 } ] }
//! ```
//!
//! The size key may be `bytes` or `size`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{Asset, ManifestFormat, ParsedManifest};
use crate::errors::PreserveError;

#[derive(Debug, Deserialize)]
struct AnalyzerFile {
    path: PathBuf,
    #[serde(alias = "size")]
    bytes: u64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalyzerReport {
    List(Vec<AnalyzerFile>),
    Scan {
        root: Option<PathBuf>,
        files: Vec<AnalyzerFile>,
    },
}

pub struct Analyzer;

impl ManifestFormat for Analyzer {
    fn name(&self) -> &'static str {
        "analyzer"
    }

    fn sniff(&self, path: &Path, content: &str) -> bool {
        let json_ext = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        json_ext || matches!(content.trim_start().chars().next(), Some('[' | '{'))
    }

    fn parse(&self, path: &Path, content: &str) -> Result<ParsedManifest, PreserveError> {
        let report: AnalyzerReport =
            serde_json::from_str(content).map_err(|e| PreserveError::ManifestParse {
                path: path.to_path_buf(),
                line: e.line(),
                reason: e.to_string(),
            })?;
        let (root, files) = match report {
            AnalyzerReport::List(files) => (None, files),
            AnalyzerReport::Scan { root, files } => (root, files),
        };
        let assets = files
            .into_iter()
            .map(|f| Asset {
                path: f.path,
                bytes: f.bytes,
            })
            .collect();
        Ok(ParsedManifest { root, assets })
    }
}
