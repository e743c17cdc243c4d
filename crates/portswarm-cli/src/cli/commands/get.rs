//! `portswarm get` – claim a port, find seeds, run the parallel download.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use portswarm_core::binder;
use portswarm_core::config::SwarmConfig;
use portswarm_core::locate;
use portswarm_core::progress::{DownloadRecord, ProgressTracker};
use portswarm_core::transfer;

pub fn run_get(cfg: &SwarmConfig, name: &str) -> Result<()> {
    let bound = binder::bind(&cfg.candidate_ports(), &cfg.share_root)?;
    // Keep serving other peers while we fetch.
    let peer = bound.spawn_listener();
    let identity = peer.identity.clone();

    let seeds = locate::scan_seeds(&cfg.candidate_ports(), identity.port, name);
    println!("Found {} seed(s) for '{}'", seeds.len(), name);

    let tracker = ProgressTracker::new();
    let download = {
        let identity = identity.clone();
        let share_root = cfg.share_root.clone();
        let tracker = tracker.clone();
        let name = name.to_string();
        let seeds = seeds.clone();
        thread::spawn(move || transfer::download(&identity, &share_root, &tracker, &name, &seeds))
    };

    while !download.is_finished() {
        for record in tracker.snapshot() {
            println!("{}", render(&record));
        }
        thread::sleep(Duration::from_millis(500));
    }
    let outcome = download
        .join()
        .map_err(|e| anyhow::anyhow!("download thread panicked: {e:?}"))??;

    if outcome.already_present {
        println!("Already present: {}", outcome.dest.display());
        return Ok(());
    }
    for record in tracker.snapshot() {
        println!("{}", render(&record));
    }
    println!("Saved to {}", outcome.dest.display());
    Ok(())
}

/// `name 12kb/100kb (12.00%)` progress line.
fn render(record: &DownloadRecord) -> String {
    format!(
        "{} {}kb/{}kb ({:.2}%)",
        record.filename,
        record.downloaded_bytes / 1024,
        record.total_size / 1024,
        record.fraction() * 100.0
    )
}
