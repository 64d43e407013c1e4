use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Hidden temp name inside `dst_dir`; the pid and clock keep concurrent runs apart.
pub(super) fn unique_temp_path(dst_dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dst_dir.join(format!(".preserve.{}.{}.tmp", pid, nanos))
}

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    // std::io::ErrorKind::CrossesDevices is not stable everywhere we build,
    // so detect EXDEV / ERROR_NOT_SAME_DEVICE via raw OS error codes.
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        #[cfg(windows)]
        Some(code) => code == 17,
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_hidden_and_inside_dir() {
        let dir = Path::new("/out/book");
        let tmp = unique_temp_path(dir);
        assert_eq!(tmp.parent(), Some(dir));
        let name = tmp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".preserve."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn plain_errors_are_not_cross_device() {
        let e = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(!is_cross_device(&e));
    }
}
