//! Safe copy-and-rename:
//! - Copies to a temp file in the destination directory
//! - Fsyncs the temp file (io_copy::copy_streaming)
//! - Renames temp -> dest, never replacing an existing destination
//!
//! A reader of the destination tree therefore sees either no file or the full file.

use anyhow::{Result, anyhow};
use std::fs;
use std::path::Path;

use super::atomic::try_atomic_move;
use super::helpers::io_error_with_help;
use super::{io_copy, util};

/// Copy `src` to `dest`, creating the destination directory on demand.
/// Returns the number of bytes copied; the source is left untouched.
pub fn safe_copy_and_rename(src: &Path, dest: &Path) -> Result<u64> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;

    fs::create_dir_all(dest_dir).map_err(io_error_with_help("create destination directory", dest_dir))?;

    let tmp_path = util::unique_temp_path(dest_dir);
    let bytes = match io_copy::copy_streaming(src, &tmp_path) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_error_with_help("copy", src)(e).into());
        }
    };

    if let Err(e) = try_atomic_move(&tmp_path, dest) {
        // Best-effort cleanup of the temp file on failure.
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error_with_help("rename temporary file into place", dest)(e).into());
    }

    Ok(bytes)
}
