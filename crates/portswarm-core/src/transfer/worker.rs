//! Per-seed download worker: fetches its assigned chunks into a private part
//! stream, strictly in increasing chunk order.

use std::fs::File;
use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::chunk;
use crate::progress::ProgressTracker;
use crate::wire::{Request, CHUNK_SIZE, INTER_CHUNK_DELAY};

/// Read budget for one chunk request; a stalled peer forfeits that chunk.
const CHUNK_READ_TIMEOUT: Duration = Duration::from_secs(5);

pub(super) struct SeedWorker {
    pub port: u16,
    pub seed_index: usize,
    pub seed_count: usize,
    pub filename: String,
    pub total_size: u64,
    pub part_path: PathBuf,
}

impl SeedWorker {
    /// Fetch every assigned chunk exactly once, appending whatever arrives.
    /// Returns the number of bytes written to the part stream.
    pub(super) fn run(&self, tracker: &ProgressTracker) -> u64 {
        let mut part = match File::create(&self.part_path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %self.part_path.display(), error = %e, "cannot create part stream");
                return 0;
            }
        };

        let chunks = chunk::chunk_count(self.total_size);
        let mut written = 0u64;
        for index in chunk::assigned_chunks(self.seed_index, self.seed_count, chunks) {
            let offset = index * CHUNK_SIZE as u64;
            let want = chunk::chunk_len(index, self.total_size) as usize;
            let data = self.fetch_chunk(offset, want).unwrap_or_default();
            if data.is_empty() {
                // No retry: the missing bytes stay a gap in this part stream.
                tracing::debug!(chunk = index, port = self.port, "empty chunk reply");
            } else {
                if let Err(e) = part.write_all(&data) {
                    tracing::warn!(path = %self.part_path.display(), error = %e, "part stream write failed");
                    break;
                }
                tracker.add_progress(&self.filename, data.len() as u64);
                written += data.len() as u64;
            }
            thread::sleep(INTER_CHUNK_DELAY);
        }
        written
    }

    /// One chunk over one fresh connection: read until `want` bytes arrive or
    /// the seed closes early, and keep whatever was received.
    fn fetch_chunk(&self, offset: u64, want: usize) -> std::io::Result<Vec<u8>> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, self.port));
        let mut stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(Some(CHUNK_READ_TIMEOUT))?;
        let request = Request::Download {
            name: self.filename.clone(),
            offset,
        };
        stream.write_all(request.encode().as_bytes())?;

        let mut data = vec![0u8; want];
        let mut filled = 0;
        while filled < want {
            match stream.read(&mut data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) => {
                    tracing::debug!(port = self.port, error = %e, "chunk read interrupted");
                    break;
                }
            }
        }
        data.truncate(filled);
        Ok(data)
    }
}
