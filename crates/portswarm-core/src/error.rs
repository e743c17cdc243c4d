//! Crate-level error taxonomy.

use thiserror::Error;

/// Failures that escalate to the caller. Network trouble during discovery or
/// chunk transfer is absorbed where it occurs and degrades to "that peer
/// contributes nothing"; only these cases surface.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// Every candidate port was already claimed. Fatal: the peer cannot serve.
    #[error("no candidate port available to bind")]
    NoPortAvailable,

    /// No reachable peer holds the requested file; nothing was written.
    #[error("no seeds hold '{0}'")]
    NoSeeds(String),

    /// Local filesystem or socket setup failure.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}
