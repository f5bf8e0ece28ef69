//! Best-effort peek at a fetched shard: leading tokens and size.
//!
//! Shards are flat arrays of little-endian u16 token ids; printing the first
//! few is a cheap sanity check that the right file came down.

use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct ShardPreview {
    pub tokens: Vec<u16>,
    pub size_bytes: u64,
}

impl ShardPreview {
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Read up to `max_tokens` leading tokens and the file size. A trailing odd
/// byte is ignored.
pub fn peek(path: &Path, max_tokens: usize) -> std::io::Result<ShardPreview> {
    let mut f = File::open(path)?;
    let size_bytes = f.metadata()?.len();

    let mut buf = vec![0u8; max_tokens * 2];
    let mut filled = 0;
    while filled < buf.len() {
        let n = f.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    let tokens = buf[..filled - filled % 2]
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect();
    Ok(ShardPreview { tokens, size_bytes })
}
