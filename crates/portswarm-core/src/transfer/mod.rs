//! Multi-seed chunk scheduler: one worker per seed, join-all, then merge.

mod worker;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crate::assemble;
use crate::binder::PeerIdentity;
use crate::chunk;
use crate::error::SwarmError;
use crate::layout;
use crate::locate;
use crate::progress::ProgressTracker;
use crate::wire::FALLBACK_TOTAL_SIZE;

/// What a finished (or skipped) download produced.
#[derive(Debug)]
pub struct DownloadOutcome {
    /// Final merged file.
    pub dest: PathBuf,
    /// Size used for scheduling: probed, or the fixed fallback.
    pub total_size: u64,
    /// Number of scheduled chunks.
    pub chunks: u64,
    /// True when a same-size local copy made the download unnecessary.
    pub already_present: bool,
}

/// Download `filename` from `seeds`, merging every seed's part stream into
/// the destination derived from this peer's identity and the first seed.
///
/// Spawns exactly one worker thread per seed (parallelism equals the seed
/// count, uncapped) and blocks until every worker has finished and the part
/// streams are merged. There is no cancellation and no per-worker timeout.
pub fn download(
    identity: &PeerIdentity,
    share_root: &Path,
    tracker: &ProgressTracker,
    filename: &str,
    seeds: &[u16],
) -> Result<DownloadOutcome> {
    if seeds.is_empty() {
        return Err(SwarmError::NoSeeds(filename.to_string()).into());
    }

    let total_size = match locate::probe_file_size(seeds[0], filename) {
        Some(size) => size,
        None => {
            tracing::warn!(
                filename,
                port = seeds[0],
                fallback = FALLBACK_TOTAL_SIZE,
                "size probe failed, using fallback size"
            );
            FALLBACK_TOTAL_SIZE
        }
    };
    let chunks = chunk::chunk_count(total_size);

    if let Some(existing) = layout::find_existing(&identity.share_dir, filename, total_size) {
        tracing::info!(filename, path = %existing.display(), "already present, skipping download");
        return Ok(DownloadOutcome {
            dest: existing,
            total_size,
            chunks,
            already_present: true,
        });
    }

    tracker.register(filename, total_size);

    let parts_dir = layout::parts_dir(share_root);
    fs::create_dir_all(&parts_dir)
        .with_context(|| format!("failed to create parts dir {}", parts_dir.display()))?;

    tracing::info!(
        filename,
        total_size,
        chunks,
        seeds = seeds.len(),
        "starting multi-seed download"
    );

    let mut handles = Vec::with_capacity(seeds.len());
    for (seed_index, &port) in seeds.iter().enumerate() {
        let seed_worker = worker::SeedWorker {
            port,
            seed_index,
            seed_count: seeds.len(),
            filename: filename.to_string(),
            total_size,
            part_path: layout::part_path(&parts_dir, filename, seed_index),
        };
        let tracker = tracker.clone();
        handles.push(thread::spawn(move || seed_worker.run(&tracker)));
    }
    for (seed_index, handle) in handles.into_iter().enumerate() {
        let bytes = handle
            .join()
            .map_err(|e| anyhow::anyhow!("seed worker {seed_index} panicked: {e:?}"))?;
        tracing::debug!(seed_index, bytes, "seed worker finished");
    }

    let dest_dir = layout::dest_dir(&identity.share_dir, seeds[0]);
    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;
    let dest = layout::dest_path(&identity.share_dir, seeds[0], filename);
    let merged = assemble::merge(filename, total_size, seeds.len(), &parts_dir, &dest)?;

    tracker.complete(filename);
    tracing::info!(filename, merged, dest = %dest.display(), "download complete");

    Ok(DownloadOutcome {
        dest,
        total_size,
        chunks,
        already_present: false,
    })
}
