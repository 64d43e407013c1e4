//! The partition flow: walk, map, check, execute, summarize.

use anyhow::Result;
use tracing::{debug, info, warn};

use super::{log_failure, setup};
use crate::cli::PartitionArgs;
use crate::errors::PreserveError;
use crate::fileset::{FileSet, PartitionPattern};
use crate::output as out;
use crate::partition::{PartitionMode, execute, validate};

const GIB: f64 = (1u64 << 30) as f64;

/// Run the partition tool.
pub fn run(args: PartitionArgs) -> Result<()> {
    let (cfg, guard) = setup(&args.log, |cfg| args.apply_overrides(cfg))?;
    debug!("Starting partition: {:?}", args);

    let result = partition(&args, &cfg.pattern);
    if let Err(e) = &result {
        log_failure(e, "partition");
    }

    drop(guard);
    result
}

/// Validate the positional arguments before touching anything.
fn check_args(args: &PartitionArgs) -> Result<(), PreserveError> {
    if !args.source.is_dir() {
        return Err(PreserveError::config(format!(
            "Source directory not found: {}",
            args.source.display()
        )));
    }
    if args.destination.exists() && !args.destination.is_dir() {
        return Err(PreserveError::config(format!(
            "Destination exists and is not a directory: {}",
            args.destination.display()
        )));
    }
    Ok(())
}

fn partition(args: &PartitionArgs, pattern: &str) -> Result<()> {
    check_args(args)?;
    let pattern = PartitionPattern::new(pattern)?;

    out::print_user("Running with the following arguments:");
    out::print_user(&format!("       source : {}", args.source.display()));
    out::print_user(&format!("  destination : {}", args.destination.display()));
    out::print_user(&format!("         mode : {}", args.mode));
    out::print_user(&format!("      pattern : {}", pattern.as_str()));

    let fileset = FileSet::from_filesystem(&args.source)?;
    out::print_user(&format!(
        "\nAnalyzing files: {} files, {:.2} GiB",
        fileset.len(),
        fileset.bytes() as f64 / GIB
    ));

    out::print_user("Creating mapping to partitioned tree...");
    let plan = fileset.partition_by(&pattern, &args.destination);
    if !plan.unmatched.is_empty() {
        warn!(count = plan.unmatched.len(), "files did not match the partitioning pattern");
        out::print_warn(&format!(
            "{} files do not match the partitioning pattern and will be skipped:",
            plan.unmatched.len()
        ));
        for path in &plan.unmatched {
            out::print_warn(&format!("  {}", path.display()));
        }
    }

    let validated = validate(&plan.mapping)?;
    out::print_user("Destination paths are all confirmed to be unique...");

    out::print_user(&format!("Partitioning files ({} mode)...", args.mode));
    let report = execute(validated, args.mode, |n, source, dest| {
        out::print_user(&format!("  {}. {} -> {}", n, source.display(), dest.display()));
    })?;

    info!(
        source = %args.source.display(),
        dest = %args.destination.display(),
        mode = %report.mode,
        files = report.files,
        bytes = report.bytes,
        unmatched = plan.unmatched.len(),
        "run finished"
    );
    match report.mode {
        PartitionMode::DryRun => out::print_user(&format!(
            "Partitioning complete. Dry run: {} files planned, nothing was written.",
            report.files
        )),
        mode => out::print_user(&format!(
            "Partitioning complete. {} files ({} bytes) {}.",
            report.files,
            report.bytes,
            if mode == PartitionMode::Move { "moved" } else { "copied" }
        )),
    }
    Ok(())
}
