//! Realize a validated mapping.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

use super::{PartitionMode, ValidatedMapping};
use crate::fs_ops::{move_file, safe_copy_and_rename};

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionReport {
    pub mode: PartitionMode,
    /// Files processed (planned, for a dry run).
    pub files: usize,
    /// Bytes written; always zero for a dry run.
    pub bytes: u64,
}

/// Process the mapping in order. `on_step` sees `(n, source, destination)`
/// (1-based) before each file is handled, in every mode.
///
/// Stops at the first failure. Files already copied or moved stay where they
/// are; there is no rollback.
pub fn execute<F>(validated: ValidatedMapping<'_>, mode: PartitionMode, mut on_step: F) -> Result<PartitionReport>
where
    F: FnMut(usize, &Path, &Path),
{
    let mapping = validated.mapping();
    let mut report = PartitionReport {
        mode,
        files: 0,
        bytes: 0,
    };

    for (n, (source, dest)) in mapping.iter().enumerate() {
        on_step(n + 1, source, dest);
        let bytes = match mode {
            PartitionMode::DryRun => 0,
            PartitionMode::Copy => safe_copy_and_rename(source, dest)?,
            PartitionMode::Move => move_file(source, dest)?,
        };
        debug!(%mode, source = %source.display(), dest = %dest.display(), bytes, "processed");
        report.files += 1;
        report.bytes += bytes;
    }

    info!(%mode, files = report.files, bytes = report.bytes, "partitioning complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{PartitionMapping, validate};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, PartitionMapping) {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("book-001_intro.txt"), vec![1u8; 10]).unwrap();
        fs::write(src.join("book-002_body.txt"), vec![2u8; 20]).unwrap();
        let out = td.path().join("out");
        let mapping = ["book-001_intro.txt", "book-002_body.txt"]
            .iter()
            .map(|n| (src.join(n), out.join("book").join(n)))
            .collect();
        (td, mapping)
    }

    #[test]
    fn dry_run_reports_steps_and_writes_nothing() {
        let (td, mapping) = setup();
        let mut seen = Vec::new();
        let report = execute(validate(&mapping).unwrap(), PartitionMode::DryRun, |n, s, d| {
            seen.push((n, s.to_path_buf(), d.to_path_buf()))
        })
        .unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.bytes, 0);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, 1);
        assert!(!td.path().join("out").exists());
    }

    #[test]
    fn copy_keeps_sources() {
        let (td, mapping) = setup();
        let report = execute(validate(&mapping).unwrap(), PartitionMode::Copy, |_, _, _| {}).unwrap();

        assert_eq!(report.bytes, 30);
        for (s, d) in mapping.iter() {
            assert!(s.exists());
            assert_eq!(fs::read(s).unwrap(), fs::read(d).unwrap());
        }
        assert!(td.path().join("out/book").is_dir());
    }

    #[test]
    fn move_relocates_files() {
        let (_td, mapping) = setup();
        let report = execute(validate(&mapping).unwrap(), PartitionMode::Move, |_, _, _| {}).unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.bytes, 30);
        let sizes: Vec<u64> = mapping.destinations().map(|d| fs::metadata(d).unwrap().len()).collect();
        assert_eq!(sizes, vec![10, 20]);
        assert!(mapping.sources().all(|s| !s.exists()));
    }

    #[test]
    fn first_failure_stops_the_run() {
        let (td, mut mapping) = setup();
        let missing = td.path().join("src/book-003_gone.txt");
        mapping.push(missing.clone(), td.path().join("out/book/book-003_gone.txt"));
        let extra = td.path().join("src/book-004_after.txt");
        fs::write(&extra, b"x").unwrap();
        let extra_dest: PathBuf = td.path().join("out/book/book-004_after.txt");
        mapping.push(extra, extra_dest.clone());

        let res = execute(validate(&mapping).unwrap(), PartitionMode::Copy, |_, _, _| {});
        assert!(res.is_err());
        assert!(td.path().join("out/book/book-001_intro.txt").exists());
        assert!(!extra_dest.exists());
    }
}
