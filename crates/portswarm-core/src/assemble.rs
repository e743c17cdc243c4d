//! Part-stream reassembly: logical chunk order, gap-tolerant.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::chunk;
use crate::layout;
use crate::storage;
use crate::wire::CHUNK_SIZE;

/// Merge every seed's part stream into `dest`, in logical chunk order.
///
/// Output byte order equals source order as long as each worker wrote its
/// assignment contiguously and in order. Chunks a worker never received are
/// skipped, not zero-filled, so the output can be shorter than `total_size`.
/// Returns the number of bytes written.
pub fn merge(
    filename: &str,
    total_size: u64,
    seed_count: usize,
    parts_dir: &Path,
    dest: &Path,
) -> Result<u64> {
    let mut out =
        File::create(dest).with_context(|| format!("failed to create {}", dest.display()))?;
    if seed_count == 0 {
        return Ok(0);
    }

    // A missing part stream just contributes nothing.
    let parts: Vec<Option<File>> = (0..seed_count)
        .map(|i| File::open(layout::part_path(parts_dir, filename, i)).ok())
        .collect();

    let mut written = 0u64;
    let mut buf = [0u8; CHUNK_SIZE];
    for index in 0..chunk::chunk_count(total_size) {
        let Some(part) = parts[chunk::seed_for_chunk(index, seed_count)].as_ref() else {
            continue;
        };
        let want = chunk::chunk_len(index, total_size) as usize;
        let offset = chunk::part_offset(index, seed_count);
        let n = storage::read_full_at(part, offset, &mut buf[..want])
            .context("part stream read failed")?;
        out.write_all(&buf[..n])
            .with_context(|| format!("failed to append to {}", dest.display()))?;
        written += n as u64;
    }
    Ok(written)
}
