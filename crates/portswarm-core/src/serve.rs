//! Inbound request handling: one request, one reply, close.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::binder::PeerIdentity;
use crate::storage;
use crate::wire::{self, Request, CHUNK_SIZE};

const IO_TIMEOUT: Duration = Duration::from_secs(2);

/// Entry point for one accepted connection. Failures are local to the
/// connection: logged, then the socket is dropped.
pub fn handle_connection(stream: TcpStream, identity: &PeerIdentity) {
    if let Err(e) = try_handle(stream, identity) {
        tracing::debug!(error = %e, "request handler closed early");
    }
}

fn try_handle(mut stream: TcpStream, identity: &PeerIdentity) -> std::io::Result<()> {
    stream.set_read_timeout(Some(IO_TIMEOUT))?;
    stream.set_write_timeout(Some(IO_TIMEOUT))?;

    let mut line = String::new();
    BufReader::new(&stream).read_line(&mut line)?;
    let request = match Request::parse(&line) {
        Some(request) => request,
        // Malformed request: close without a reply.
        None => return Ok(()),
    };

    match request {
        Request::List => {
            let listing = share_listing(&identity.share_dir);
            stream.write_all(listing.as_bytes())
        }
        Request::FileSize { name } => {
            let reply = match share_file_size(&identity.share_dir, &name) {
                Some(size) => wire::size_reply(size),
                None => wire::NOT_FOUND_REPLY.to_string(),
            };
            stream.write_all(reply.as_bytes())
        }
        Request::Download { name, offset } => {
            send_chunk(&mut stream, &identity.share_dir, &name, offset)
        }
    }
}

/// Numbered listing of the share directory, freshly scanned per request.
/// Entries are sorted by name so the enumeration is stable across peers.
pub fn share_listing(share_dir: &Path) -> String {
    let mut names: Vec<String> = match fs::read_dir(share_dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
        .iter()
        .enumerate()
        .map(|(i, name)| wire::listing_line(i + 1, name))
        .collect()
}

fn share_file_size(share_dir: &Path, name: &str) -> Option<u64> {
    let path = resolve(share_dir, name)?;
    fs::metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len())
}

/// Up to one chunk of raw bytes from `offset`; zero bytes when the offset is
/// at or past the end, the not-found string when the file is absent.
fn send_chunk(
    stream: &mut TcpStream,
    share_dir: &Path,
    name: &str,
    offset: u64,
) -> std::io::Result<()> {
    let file = match resolve(share_dir, name).and_then(|p| File::open(p).ok()) {
        Some(file) => file,
        None => return stream.write_all(wire::NOT_FOUND_REPLY.as_bytes()),
    };
    let size = file.metadata()?.len();
    if offset >= size {
        return Ok(());
    }
    let mut buf = [0u8; CHUNK_SIZE];
    let n = storage::read_full_at(&file, offset, &mut buf)?;
    stream.write_all(&buf[..n])
}

/// Requests may only name entries directly inside the share dir.
fn resolve(share_dir: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains('/') || name.contains("..") {
        return None;
    }
    Some(share_dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_is_sorted_and_numbered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.bin"), b"b").unwrap();
        fs::write(dir.path().join("a.bin"), b"a").unwrap();
        fs::create_dir(dir.path().join("parts")).unwrap();

        let listing = share_listing(dir.path());
        assert_eq!(listing, "[1] a.bin\n[2] b.bin\n");
    }

    #[test]
    fn listing_of_empty_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(share_listing(dir.path()), "");
    }

    #[test]
    fn resolve_rejects_traversal() {
        let dir = Path::new("/tmp/share");
        assert!(resolve(dir, "../etc/passwd").is_none());
        assert!(resolve(dir, "sub/file").is_none());
        assert!(resolve(dir, "").is_none());
        assert!(resolve(dir, "plain.bin").is_some());
    }

    #[test]
    fn file_size_of_missing_entry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), b"12345").unwrap();
        assert_eq!(share_file_size(dir.path(), "a.bin"), Some(5));
        assert_eq!(share_file_size(dir.path(), "missing.bin"), None);
    }
}
