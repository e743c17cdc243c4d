//! Line-oriented request protocol between peers.
//!
//! One request per connection: the client sends a single newline-terminated
//! line, the server answers once and closes. `LIST` and `FILESIZE` replies
//! are text; `DOWNLOAD` replies are raw bytes with no length prefix, so an
//! absent-file error string is indistinguishable from short binary content.
//! Callers therefore never interpret a `DOWNLOAD` reply: a short one is a
//! gap, nothing more.

use std::time::Duration;

/// Unit of transfer and scheduling, shared by scheduler and reassembler.
pub const CHUNK_SIZE: usize = 32;

/// Pause between consecutive chunk requests from one worker.
pub const INTER_CHUNK_DELAY: Duration = Duration::from_millis(5);

/// Assumed file size when the size probe fails (10 KiB).
pub const FALLBACK_TOTAL_SIZE: u64 = CHUNK_SIZE as u64 * 320;

/// Text reply for a missing file on `FILESIZE` and `DOWNLOAD`.
pub const NOT_FOUND_REPLY: &str = "File not found";

/// A parsed peer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Numbered listing of the peer's share directory.
    List,
    /// Size in bytes of one shared file.
    FileSize { name: String },
    /// Up to one chunk of raw bytes starting at `offset`.
    Download { name: String, offset: u64 },
}

impl Request {
    /// Parse one request line. Anything malformed is None; the server closes
    /// such connections without a reply.
    pub fn parse(line: &str) -> Option<Request> {
        let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
        if line == "LIST" {
            return Some(Request::List);
        }
        if let Some(name) = line.strip_prefix("FILESIZE ") {
            return (!name.is_empty()).then(|| Request::FileSize {
                name: name.to_string(),
            });
        }
        if let Some(rest) = line.strip_prefix("DOWNLOAD ") {
            // A missing offset separator means "from the start".
            let (name, offset) = match rest.split_once('|') {
                Some((name, off)) => (name, off.trim().parse::<u64>().ok()?),
                None => (rest, 0),
            };
            return (!name.is_empty()).then(|| Request::Download {
                name: name.to_string(),
                offset,
            });
        }
        None
    }

    /// Encode as a wire line, newline-terminated.
    pub fn encode(&self) -> String {
        match self {
            Request::List => "LIST\n".to_string(),
            Request::FileSize { name } => format!("FILESIZE {name}\n"),
            Request::Download { name, offset } => format!("DOWNLOAD {name}|{offset}\n"),
        }
    }
}

/// `SIZE:<bytes>` reply for a successful `FILESIZE`.
pub fn size_reply(bytes: u64) -> String {
    format!("SIZE:{bytes}")
}

/// Parse a `FILESIZE` reply; anything but a well-formed `SIZE:` line is None.
pub fn parse_size_reply(reply: &str) -> Option<u64> {
    reply.trim().strip_prefix("SIZE:")?.parse().ok()
}

/// One `[<n>] <name>` listing line (1-indexed), newline-terminated.
pub fn listing_line(index: usize, name: &str) -> String {
    format!("[{index}] {name}\n")
}

/// Extract the filename from a `[<n>] <name>` listing line.
pub fn parse_listing_line(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let (_, name) = rest.split_once("] ")?;
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list() {
        assert_eq!(Request::parse("LIST\n"), Some(Request::List));
        assert_eq!(Request::parse("LIST"), Some(Request::List));
        assert_eq!(Request::parse("LISTING"), None);
    }

    #[test]
    fn parse_filesize() {
        assert_eq!(
            Request::parse("FILESIZE a.bin\r\n"),
            Some(Request::FileSize {
                name: "a.bin".to_string()
            })
        );
        assert_eq!(Request::parse("FILESIZE "), None);
    }

    #[test]
    fn parse_download_with_offset() {
        assert_eq!(
            Request::parse("DOWNLOAD a.bin|96\n"),
            Some(Request::Download {
                name: "a.bin".to_string(),
                offset: 96
            })
        );
    }

    #[test]
    fn parse_download_without_offset_starts_at_zero() {
        assert_eq!(
            Request::parse("DOWNLOAD a.bin"),
            Some(Request::Download {
                name: "a.bin".to_string(),
                offset: 0
            })
        );
    }

    #[test]
    fn parse_download_bad_offset_is_rejected() {
        assert_eq!(Request::parse("DOWNLOAD a.bin|ninety"), None);
        assert_eq!(Request::parse("DOWNLOAD |12"), None);
    }

    #[test]
    fn request_roundtrip() {
        let requests = [
            Request::List,
            Request::FileSize {
                name: "kernel.img".to_string(),
            },
            Request::Download {
                name: "kernel.img".to_string(),
                offset: 4096,
            },
        ];
        for request in requests {
            assert_eq!(Request::parse(&request.encode()), Some(request));
        }
    }

    #[test]
    fn size_reply_roundtrip() {
        assert_eq!(parse_size_reply(&size_reply(12345)), Some(12345));
        assert_eq!(parse_size_reply("SIZE:0"), Some(0));
        assert_eq!(parse_size_reply(NOT_FOUND_REPLY), None);
        assert_eq!(parse_size_reply("SIZE:abc"), None);
    }

    #[test]
    fn listing_line_roundtrip() {
        let line = listing_line(3, "notes.txt");
        assert_eq!(line, "[3] notes.txt\n");
        assert_eq!(parse_listing_line(line.trim_end()), Some("notes.txt"));
    }

    #[test]
    fn listing_line_malformed() {
        assert_eq!(parse_listing_line("notes.txt"), None);
        assert_eq!(parse_listing_line("[1]"), None);
        assert_eq!(parse_listing_line("[1] "), None);
    }
}
