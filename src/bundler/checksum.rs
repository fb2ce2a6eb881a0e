//! SHA-256 checksums and `sha256sum`-style listings.

use crate::bundler::error::{ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::{collections::BTreeMap, fmt::Write, path::Path};
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 8192;

/// Calculates the SHA-256 of a file, streamed in 8 KiB chunks.
///
/// Returns the lowercase hex digest (64 characters).
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for checksum", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for checksum", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Digest of an in-memory buffer.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Renders `{digest}  {filename}` lines, sorted by file name.
pub fn render_listing(checksums: &BTreeMap<String, String>) -> String {
    let mut listing = String::new();
    for (filename, digest) in checksums {
        let _ = writeln!(listing, "{digest}  {filename}");
    }
    listing
}
