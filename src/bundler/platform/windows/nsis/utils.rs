//! NSIS helper functions.

use crate::bundler::error::{ErrorExt, Result};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Format a release version for NSIS `VIProductVersion`.
///
/// NSIS requires exactly four numeric parts. A leading `v` is dropped, each
/// part keeps only its leading digits, missing parts become `0` and extra
/// parts are truncated:
/// - "1.2" -> "1.2.0.0"
/// - "v1.2.3-rc1" -> "1.2.3.0"
/// - "latest" -> "0.0.0.0"
pub fn format_version_for_nsis(version: &str) -> String {
    let trimmed = version.trim().trim_start_matches(['v', 'V']);
    let mut parts: Vec<String> = trimmed
        .split('.')
        .take(4)
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() { "0".to_string() } else { digits }
        })
        .collect();
    parts.resize(4, "0".to_string());
    parts.join(".")
}

/// Write file with UTF-8 BOM (EF BB BF) followed by the content.
pub async fn write_utf8_bom(path: &Path, content: &str) -> Result<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .fs_context("creating NSI script file", path)?;

    file.write_all(&[0xEF, 0xBB, 0xBF])
        .await
        .fs_context("writing UTF-8 BOM", path)?;
    file.write_all(content.as_bytes())
        .await
        .fs_context("writing NSI content", path)?;
    file.flush().await.fs_context("flushing NSI file", path)?;

    Ok(())
}
