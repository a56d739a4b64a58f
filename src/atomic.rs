//! Atomic File Writer
//!
//! Writes a byte payload to a target path such that observers see either the
//! old complete content or the new complete content, never a partial file,
//! even if the process terminates mid-write.
//!
//! ## Protocol
//!
//! 1. Create a temporary file in the same directory as the target
//!    (rename is only atomic within one filesystem)
//! 2. Write the full payload and fsync the temporary file
//! 3. Atomically rename it onto the target (the commit point)
//! 4. On Unix, fsync the parent directory so the rename itself is durable
//!
//! If the rename fails the target is left untouched and the temporary file
//! is removed best-effort when the handle drops.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Result;

/// Atomically replace the content of `path` with `bytes`
///
/// Missing parent directories are created. Failure at any step before the
/// rename leaves the previous content of `path` intact.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempfile_in(parent)?;

    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    persist(tmp, path)?;
    sync_dir(parent)?;

    Ok(())
}

/// Rename the temporary file onto the target (the commit point)
fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    // PersistError keeps the temp handle; dropping it unlinks the temp file
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Fsync a directory so a completed rename survives power loss
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    // Directory handles cannot be fsynced portably; rename durability is
    // left to the OS on non-Unix targets
    Ok(())
}

/// True for temporary or hidden files that enumeration must ignore
pub(crate) fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
