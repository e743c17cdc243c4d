use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/portswarm/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// First port of the candidate pool.
    pub base_port: u16,
    /// Number of consecutive candidate ports, one per possible peer.
    pub port_count: u16,
    /// Root directory holding every peer's share directory and part streams.
    pub share_root: PathBuf,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            base_port: 8080,
            port_count: 5,
            share_root: PathBuf::from("files"),
        }
    }
}

impl SwarmConfig {
    /// The fixed candidate pool, in bind/probe order.
    pub fn candidate_ports(&self) -> Vec<u16> {
        (0..self.port_count).map(|i| self.base_port + i).collect()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("portswarm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SwarmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SwarmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SwarmConfig = toml::from_str(&data)?;
    Ok(cfg)
}
