//! IBM Spectrum Protect (TSM) `dsmc query backup` listings.
//!
//! ```text
//!              Size        Backup Date                Mgmt Class           A/I File
//!              ----        -----------                ----------           --- ----
//!          1,024  B  06/15/2020 10:20:30             DEFAULT               A  /fs/dir/file.txt
//! ```
//!
//! Only active (`A`) versions are listed; inactive versions are older copies
//! of the same file. Lines that are not rows (banners, headers) are ignored.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::{Asset, ManifestFormat, ParsedManifest};
use crate::errors::PreserveError;

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\d][\d,.]*)\s+B\s+\S+\s+\S+\s+\S+\s+([AI])\s+(\S.*?)\s*$")
        .expect("static regex")
});

pub struct TsmBackup;

impl ManifestFormat for TsmBackup {
    fn name(&self) -> &'static str {
        "tsm"
    }

    fn sniff(&self, path: &Path, content: &str) -> bool {
        let tsm_ext = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("tsm"));
        tsm_ext || content.contains("Mgmt Class") || content.lines().any(|l| ROW.is_match(l))
    }

    fn parse(&self, path: &Path, content: &str) -> Result<ParsedManifest, PreserveError> {
        let mut assets = Vec::new();
        for (i, line) in content.lines().enumerate() {
            let Some(caps) = ROW.captures(line) else {
                continue;
            };
            if &caps[2] != "A" {
                continue;
            }
            let digits: String = caps[1].chars().filter(char::is_ascii_digit).collect();
            let bytes = digits.parse::<u64>().map_err(|e| PreserveError::ManifestParse {
                path: path.to_path_buf(),
                line: i + 1,
                reason: format!("invalid size '{}': {e}", &caps[1]),
            })?;
            assets.push(Asset {
                path: PathBuf::from(&caps[3]),
                bytes,
            });
        }
        Ok(ParsedManifest { root: None, assets })
    }
}
