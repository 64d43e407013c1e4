//! File move implementation.
//! Attempts an atomic rename; on a cross-filesystem error falls back to
//! safe copy+rename followed by removal of the source.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::atomic::try_atomic_move;
use super::copy::safe_copy_and_rename;
use super::helpers::io_error_with_help;
use super::util::is_cross_device;

/// Move `src` to `dest`, creating the destination directory on demand.
/// Returns the number of bytes moved.
pub fn move_file(src: &Path, dest: &Path) -> Result<u64> {
    let bytes = fs::metadata(src)
        .map_err(io_error_with_help("stat source", src))?
        .len();

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_error_with_help("create destination directory", parent))?;
    }

    match try_atomic_move(src, dest) {
        Ok(()) => {
            debug!(src = %src.display(), dest = %dest.display(), "renamed file atomically");
            Ok(bytes)
        }
        Err(e) if is_cross_device(&e) => {
            warn!(error = %e, src = %src.display(), "cross-filesystem move; using copy+remove");
            let copied = safe_copy_and_rename(src, dest)?;
            fs::remove_file(src).map_err(io_error_with_help("remove original file", src))?;
            Ok(copied)
        }
        Err(e) => Err(io_error_with_help("move", src)(e).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn moves_and_removes_source() {
        let td = tempdir().unwrap();
        let src = td.path().join("book-002_body.txt");
        fs::write(&src, vec![7u8; 20]).unwrap();
        let dest = td.path().join("out").join("book").join("book-002_body.txt");

        assert_eq!(move_file(&src, &dest).unwrap(), 20);
        assert!(!src.exists());
        assert_eq!(fs::metadata(&dest).unwrap().len(), 20);
    }

    #[test]
    fn existing_destination_is_left_alone() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dest = td.path().join("b.txt");
        fs::write(&src, b"src").unwrap();
        fs::write(&dest, b"dest").unwrap();

        assert!(move_file(&src, &dest).is_err());
        assert!(src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"dest");
    }
}
