//! `portswarm list` – show every file advertised across the pool.

use anyhow::Result;
use portswarm_core::config::SwarmConfig;
use portswarm_core::locate;

pub fn run_list(cfg: &SwarmConfig) -> Result<()> {
    // Standalone listing: no bound identity, so no candidate is "self".
    let entries = locate::enumerate_files(&cfg.candidate_ports(), 0);
    if entries.is_empty() {
        println!("No files advertised by any peer.");
        return Ok(());
    }
    println!("{:<6} {:<8} {}", "ID", "PORT", "FILE");
    for (i, entry) in entries.iter().enumerate() {
        println!("{:<6} {:<8} {}", i + 1, entry.source_port, entry.name);
    }
    Ok(())
}
