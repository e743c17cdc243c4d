//! Test helpers: boot real peers on ephemeral loopback ports.

use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;

use tempfile::TempDir;

use portswarm_core::binder::{self, PeerHandle};

/// One running peer backed by its own scratch share root.
pub struct TestPeer {
    pub handle: PeerHandle,
    pub root: PathBuf,
    _dir: TempDir,
}

impl TestPeer {
    pub fn port(&self) -> u16 {
        self.handle.identity.port
    }

    pub fn share_dir(&self) -> PathBuf {
        self.handle.identity.share_dir.clone()
    }
}

/// Start a peer on a kernel-assigned port, pre-populating its share dir.
/// The peer serves until the process exits.
pub fn start_peer(files: &[(&str, &[u8])]) -> TestPeer {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path().to_path_buf();
    let bound = binder::bind(&[0], &root).expect("bind ephemeral port");
    for (name, bytes) in files {
        fs::write(bound.identity().share_dir.join(name), bytes).expect("seed file");
    }
    let handle = bound.spawn_listener();
    TestPeer {
        handle,
        root,
        _dir: dir,
    }
}

/// A loopback port with nothing listening on it.
pub fn refused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("probe bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}
