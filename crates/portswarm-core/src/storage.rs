//! Positional reads for share files and part streams.

use std::fs::File;
use std::io;
#[cfg(unix)]
use std::os::unix::fs::FileExt;

/// Read at `offset` into `buf` without moving the file cursor (pread-style);
/// safe for concurrent use on a shared handle.
#[cfg(unix)]
pub fn read_at(file: &File, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
    file.read_at(buf, offset)
}

/// Stub for non-Unix (e.g. Windows): use seek + read. Not safe for concurrent use.
#[cfg(not(unix))]
pub fn read_at(file: &File, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
    use std::io::{Read, Seek, SeekFrom};
    let mut f = file.try_clone()?;
    f.seek(SeekFrom::Start(offset))?;
    f.read(buf)
}

/// Fill `buf` from `offset`, tolerating a short file: returns how many bytes
/// were actually available.
pub fn read_full_at(file: &File, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = read_at(file, offset + filled as u64, &mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_full_at_middle_and_past_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"0123456789").unwrap();
        drop(f);

        let f = File::open(&path).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(read_full_at(&f, 3, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"3456");

        // Short read at the tail, zero past the end.
        assert_eq!(read_full_at(&f, 8, &mut buf).unwrap(), 2);
        assert_eq!(read_full_at(&f, 20, &mut buf).unwrap(), 0);
    }
}
