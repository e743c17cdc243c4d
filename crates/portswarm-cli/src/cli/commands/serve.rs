//! `portswarm serve` – claim a port and serve the share dir until killed.

use anyhow::Result;
use portswarm_core::binder;
use portswarm_core::config::SwarmConfig;

pub fn run_serve(cfg: &SwarmConfig) -> Result<()> {
    let bound = binder::bind(&cfg.candidate_ports(), &cfg.share_root)?;
    let identity = bound.identity();
    println!(
        "Serving {} on port {}",
        identity.share_dir.display(),
        identity.port
    );
    bound.spawn_listener().join();
    Ok(())
}
