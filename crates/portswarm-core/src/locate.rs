//! Seed discovery: probe candidate peers over the wire protocol.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;

use crate::wire::{self, Request};

/// Connect/read budget for one probe; an unresponsive peer is just skipped.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// One advertised file, attributed to the first peer seen holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub source_port: u16,
}

/// Ports (other than `self_port`) confirmed to hold `filename`, in candidate
/// order. Any probe failure or empty reply excludes that peer; nothing is
/// retried or surfaced as an error. Rebuilt from scratch on every call.
pub fn scan_seeds(candidates: &[u16], self_port: u16, filename: &str) -> Vec<u16> {
    let mut seeds = Vec::new();
    for &port in candidates.iter().filter(|&&p| p != self_port) {
        let Some(listing) = fetch_listing(port) else {
            tracing::debug!(port, "peer unreachable, skipping");
            continue;
        };
        let held = listing
            .lines()
            .filter_map(wire::parse_listing_line)
            .any(|name| name == filename);
        if held {
            seeds.push(port);
        }
    }
    tracing::debug!(filename, seeds = seeds.len(), "seed scan finished");
    seeds
}

/// Fresh swarm-wide catalog: every advertised name once, attributed to the
/// first candidate that listed it. Never accumulated across calls.
pub fn enumerate_files(candidates: &[u16], self_port: u16) -> Vec<FileEntry> {
    let mut entries: Vec<FileEntry> = Vec::new();
    for &port in candidates.iter().filter(|&&p| p != self_port) {
        let Some(listing) = fetch_listing(port) else {
            continue;
        };
        for name in listing.lines().filter_map(wire::parse_listing_line) {
            if entries.iter().all(|e| e.name != name) {
                entries.push(FileEntry {
                    name: name.to_string(),
                    source_port: port,
                });
            }
        }
    }
    entries
}

/// Ask one peer for its size of `name`. None covers every failure mode:
/// unreachable peer, missing file, malformed reply.
pub fn probe_file_size(port: u16, name: &str) -> Option<u64> {
    let reply = request_text(
        port,
        &Request::FileSize {
            name: name.to_string(),
        },
    )?;
    wire::parse_size_reply(&reply)
}

fn fetch_listing(port: u16) -> Option<String> {
    request_text(port, &Request::List)
}

/// One-shot text exchange: connect, send, read until the peer closes.
fn request_text(port: u16, request: &Request) -> Option<String> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let mut stream = TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).ok()?;
    stream.set_read_timeout(Some(PROBE_TIMEOUT)).ok()?;
    stream.set_write_timeout(Some(PROBE_TIMEOUT)).ok()?;
    stream.write_all(request.encode().as_bytes()).ok()?;
    let mut reply = String::new();
    stream.read_to_string(&mut reply).ok()?;
    Some(reply)
}
