//! Streamed SHA-256 digests of shard files.
//!
//! Shards can be gigabytes, so the file is fed through the hasher in
//! fixed-size blocks rather than read whole.

use crate::error::StageError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BLOCK_SIZE: usize = 64 * 1024;

/// Compute the SHA-256 of a file, returned as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String, StageError> {
    let mut f = File::open(path).map_err(|e| StageError::File {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut hasher = Sha256::new();
    let mut block = [0u8; BLOCK_SIZE];
    loop {
        let n = f.read(&mut block).map_err(|e| StageError::File {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// First 16 characters of a digest, for log lines and mismatch reports.
pub fn short(digest: &str) -> &str {
    &digest[..digest.len().min(16)]
}
