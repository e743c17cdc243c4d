//! Port claim and passive listener bootstrap.

use std::fs;
use std::net::{Ipv4Addr, TcpListener};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crate::error::SwarmError;
use crate::layout;
use crate::serve;

/// Identity a peer claims at bind time; immutable afterwards.
#[derive(Debug, Clone)]
pub struct PeerIdentity {
    /// Port this peer serves on.
    pub port: u16,
    /// Position of the claimed candidate in the pool; derives the share dir.
    pub pool_index: usize,
    /// Directory whose contents this peer advertises.
    pub share_dir: PathBuf,
}

/// A successfully bound peer, not yet accepting connections.
pub struct BoundPeer {
    identity: PeerIdentity,
    listener: TcpListener,
}

/// Claim the first free candidate port, in order. Each candidate is tried
/// exactly once: a taken port is assumed held by a sibling peer, not
/// transient contention, so there is no retry.
pub fn bind(candidates: &[u16], share_root: &Path) -> Result<BoundPeer, SwarmError> {
    for (pool_index, &candidate) in candidates.iter().enumerate() {
        let listener = match TcpListener::bind((Ipv4Addr::LOCALHOST, candidate)) {
            Ok(listener) => listener,
            Err(e) => {
                tracing::debug!(port = candidate, error = %e, "candidate port taken");
                continue;
            }
        };
        // Candidate 0 asks the kernel for a port; report what we actually got.
        let port = listener.local_addr()?.port();
        let share_dir = layout::share_dir(share_root, pool_index);
        fs::create_dir_all(&share_dir)?;
        tracing::info!(port, share_dir = %share_dir.display(), "peer bound");
        return Ok(BoundPeer {
            identity: PeerIdentity {
                port,
                pool_index,
                share_dir,
            },
            listener,
        });
    }
    Err(SwarmError::NoPortAvailable)
}

impl BoundPeer {
    pub fn identity(&self) -> &PeerIdentity {
        &self.identity
    }

    /// Start the unbounded accept loop: one detached handler thread per
    /// accepted connection. The accept thread itself is handed back so the
    /// caller owns its lifetime instead of it being fire-and-forget.
    pub fn spawn_listener(self) -> PeerHandle {
        let BoundPeer { identity, listener } = self;
        let accept_identity = identity.clone();
        let accept_thread = thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let identity = accept_identity.clone();
                thread::spawn(move || serve::handle_connection(stream, &identity));
            }
        });
        PeerHandle {
            identity,
            accept_thread,
        }
    }
}

/// Running peer: identity plus the accept-loop thread handle.
pub struct PeerHandle {
    pub identity: PeerIdentity,
    accept_thread: JoinHandle<()>,
}

impl PeerHandle {
    /// Block on the accept loop; it only ends when the process does.
    pub fn join(self) {
        let _ = self.accept_thread.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_claims_first_free_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let bound = bind(&[0], dir.path()).unwrap();
        assert_ne!(bound.identity().port, 0);
        assert_eq!(bound.identity().pool_index, 0);
        assert!(bound.identity().share_dir.is_dir());
    }

    #[test]
    fn bind_skips_taken_port() {
        let dir = tempfile::tempdir().unwrap();
        let holder = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let taken = holder.local_addr().unwrap().port();

        let bound = bind(&[taken, 0], dir.path()).unwrap();
        assert_ne!(bound.identity().port, taken);
        assert_eq!(bound.identity().pool_index, 1);
    }

    #[test]
    fn bind_fails_when_every_candidate_is_taken() {
        let dir = tempfile::tempdir().unwrap();
        let holder = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let taken = holder.local_addr().unwrap().port();

        let err = bind(&[taken], dir.path()).err().expect("bind must fail");
        assert!(matches!(err, SwarmError::NoPortAvailable));
    }
}
