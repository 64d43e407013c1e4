//! Atomic rename helper.
//! - Refuses to replace an existing destination on every platform.
//! - On Unix, best-effort fsync of the destination directory after rename.

use std::fs;
use std::io;
use std::path::Path;

/// Rename `src` onto `dst`. Errors are returned raw so callers can detect
/// cross-device failures and fall back to copying.
pub(super) fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    // fs::rename silently replaces on Unix; the destination must stay untouched.
    if fs::symlink_metadata(dst).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        ));
    }

    fs::rename(src, dst)?;

    if let Some(parent) = dst.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = super::util::fsync_dir(parent);
    }

    Ok(())
}
