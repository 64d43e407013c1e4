//! I/O error helpers.
//!
//! Wraps io::Error into `PreserveError::Filesystem` with the failed operation,
//! the path involved and a short platform-aware hint.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;

use std::io;
use std::path::Path;

use crate::errors::PreserveError;

/// Short hint for the most common failure causes, keyed by raw OS code first.
fn hint(e: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        let h = match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
            libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
            libc::ENOENT => Some("path not found; verify it exists"),
            libc::EEXIST => Some("already exists; remove the target or pick another destination"),
            libc::ENOSPC => Some("insufficient space on device"),
            libc::EROFS => Some("read-only filesystem; cannot write here"),
            libc::ENAMETOOLONG => Some("filename or path too long"),
            _ => None,
        };
        if h.is_some() {
            return h;
        }
    }

    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists; remove the target or pick another destination"),
        _ => None,
    }
}

/// Returns a closure suitable for `.map_err(...)` that converts io::Error into
/// a typed filesystem error. The original ErrorKind is preserved.
pub fn io_error_with_help<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> PreserveError + 'a {
    move |e: io::Error| {
        let source = match hint(&e) {
            Some(h) => io::Error::new(e.kind(), format!("{e} ({h})")),
            None => e,
        };
        PreserveError::Filesystem {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_gets_op_path_and_hint() {
        let e = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = io_error_with_help("open source", Path::new("/nope/a.txt"))(e);
        match &err {
            PreserveError::Filesystem { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let msg = format!("{:#}", anyhow::Error::from(err));
        assert!(msg.starts_with("open source '/nope/a.txt': no such file"));
        assert!(msg.contains("verify it exists"));
    }

    #[test]
    fn unknown_errors_pass_through_unchanged() {
        let e = io::Error::other("weird");
        let msg = format!("{:#}", anyhow::Error::from(io_error_with_help("copy", Path::new("/x"))(e)));
        assert_eq!(msg, "copy '/x': weird");
    }
}
