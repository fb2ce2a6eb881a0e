//! File system utilities for staging packages.
//!
//! Provides file operations with automatic parent directory creation
//! and path-aware error reporting.

use crate::bail;
use crate::bundler::error::{ErrorExt, Result};
use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};
use tokio::{fs, io::AsyncWriteExt};

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase && path.exists() {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .await
            .fs_context("removing directory", path)
    } else {
        Ok(())
    }
}

/// Writes `contents` to `path`, creating any parent directories as needed.
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    let mut file = fs::File::create(path)
        .await
        .fs_context("creating file", path)?;
    file.write_all(contents.as_ref())
        .await
        .fs_context("writing file", path)?;
    file.flush().await.fs_context("flushing file", path)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        bail!("{from:?} does not exist");
    }
    if !from.is_file() {
        bail!("{from:?} is not a file");
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Copies `from` to `to` when the source is a regular file.
///
/// A missing source is not an error: it is logged and `false` is returned.
pub async fn copy_if_present(from: &Path, to: &Path) -> Result<bool> {
    if !from.is_file() {
        log::debug!("Skipping missing input {}", from.display());
        return Ok(false);
    }
    copy_file(from, to).await?;
    Ok(true)
}

/// Returns the most recently modified regular file in `dir` whose name
/// matches the glob `file_pattern` and satisfies `accept`.
pub fn newest_match(
    dir: &Path,
    file_pattern: &str,
    accept: impl Fn(&Path) -> bool,
) -> Result<Option<PathBuf>> {
    let pattern = format!(
        "{}/{file_pattern}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if !path.is_file() || !accept(&path) {
            continue;
        }
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if newest.as_ref().is_none_or(|(seen, _)| modified > *seen) {
            newest = Some((modified, path));
        }
    }
    Ok(newest.map(|(_, path)| path))
}

/// Marks a file as executable (`0o755`). No-op on non-unix hosts.
pub async fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("setting permissions on", path)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
