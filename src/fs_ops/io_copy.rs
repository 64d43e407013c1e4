//! Streaming copy into a freshly created file.
//!
//! - The destination is opened with `create_new`, so an existing file is never clobbered.
//! - Buffered I/O with large (1 MiB) buffers to reduce syscall count.
//! - The destination is fsynced before returning.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` -> `dst` and return the number of bytes written.
/// Callers are responsible for syncing the parent directory after any rename.
pub(super) fn copy_streaming(src: &Path, dst: &Path) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn copy_small_file_ok() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src.txt");
        let dst_path = dir.path().join("dst.txt");
        fs::write(&src_path, b"hello world").unwrap();

        let n = copy_streaming(&src_path, &dst_path).unwrap();
        assert_eq!(n, 11);
        assert_eq!(fs::read(&dst_path).unwrap(), b"hello world");
    }

    #[test]
    fn copy_zero_length_ok() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("empty");
        let dst_path = dir.path().join("out");
        File::create(&src_path).unwrap();

        assert_eq!(copy_streaming(&src_path, &dst_path).unwrap(), 0);
        assert_eq!(fs::metadata(&dst_path).unwrap().len(), 0);
    }

    #[test]
    fn fails_if_dest_exists() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src");
        let dst_path = dir.path().join("dst");
        fs::write(&src_path, b"data").unwrap();
        fs::write(&dst_path, b"x").unwrap();

        let err = copy_streaming(&src_path, &dst_path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dst_path).unwrap(), b"x");
    }

    #[test]
    fn copies_across_buffer_boundaries() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("big.bin");
        let dst = dir.path().join("big.out");

        let size = 2 * BUF_SIZE + 123;
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        fs::write(&src, &data).unwrap();

        assert_eq!(copy_streaming(&src, &dst).unwrap() as usize, size);
        assert_eq!(fs::read(&dst).unwrap(), data);
    }
}
