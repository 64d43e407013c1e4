//! The manifest flows: compare and inventory.

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::{debug, info};

use super::{log_failure, setup};
use crate::cli::{Command, PreserveArgs};
use crate::compare::{compare, load_all, report_lines};
use crate::errors::PreserveError;
use crate::fileset::FileSet;
use crate::fs_ops::io_error_with_help;
use crate::manifest::write_inventory;
use crate::output as out;

/// Run the manifest tool.
pub fn run(args: PreserveArgs) -> Result<()> {
    let (_cfg, guard) = setup(&args.log, |cfg| args.log.apply_overrides(cfg))?;
    debug!("Starting preserve: {:?}", args);

    let (what, result) = match &args.command {
        Command::Compare { first, other } => {
            let mut paths = vec![first.clone()];
            paths.extend(other.iter().cloned());
            ("compare", run_compare(&paths))
        }
        Command::Inventory { root, output } => ("inventory", run_inventory(root, output.as_deref())),
    };
    if let Err(e) = &result {
        log_failure(e, what);
    }

    drop(guard);
    result
}

fn run_compare(paths: &[std::path::PathBuf]) -> Result<()> {
    let manifests = load_all(paths)?;
    for m in &manifests {
        info!(path = %m.origin().display(), format = m.format(), root = ?m.root(), assets = m.len(), "loaded manifest");
    }
    let cmp = compare(&manifests)?;
    for line in report_lines(&cmp) {
        out::print_user(&line);
    }
    out::print_user("");
    Ok(())
}

fn run_inventory(root: &Path, output: Option<&Path>) -> Result<()> {
    // The declared root is written into the file, so make it absolute.
    let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let files = FileSet::from_filesystem(&root)?;
    match output {
        None => {
            let stdout = io::stdout();
            write_inventory(&files, stdout.lock()).map_err(io_error_with_help("write inventory", Path::new("<stdout>")))?;
        }
        Some(path) => {
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| match e.kind() {
                    io::ErrorKind::AlreadyExists => PreserveError::ClobberingFiles(vec![path.to_path_buf()]),
                    _ => io_error_with_help("create inventory", path)(e),
                })?;
            write_inventory(&files, BufWriter::new(file)).map_err(io_error_with_help("write inventory", path))?;
            out::print_success(&format!(
                "Wrote inventory of {} files ({} bytes) to {}",
                files.len(),
                files.bytes(),
                path.display()
            ));
        }
    }
    info!(root = %root.display(), files = files.len(), bytes = files.bytes(), "inventory written");
    Ok(())
}
