//! Atomic replacement of the exported file.
//!
//! The document is written to a uniquely named temporary file next to the target, flushed to
//! the medium, and then renamed over the target. A reader of the target path sees either the
//! previous file or the new one, never a partial write.

use crate::error::ExportFault;
use async_trait::async_trait;
use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{trace, warn};
use uuid::Uuid;

/// Writes bytes to a file that does not exist yet.
#[async_trait]
pub trait Sink: Send + Sync + Debug {
    /// Creates `path`, writes all of `bytes` and flushes them to the medium before returning.
    async fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// The default `Sink`, backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskSink;

#[async_trait]
impl Sink for DiskSink {
    async fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await
    }
}

/// Replaces `target` with `bytes` using `sink` for the write.
pub(super) async fn replace(sink: &dyn Sink, target: &Path, bytes: &[u8]) -> Result<(), ExportFault> {
    let temp = temp_path(target);
    trace!("Writing export to temporary file {}", temp.display());

    if let Err(source) = sink.write_new(&temp, bytes).await {
        discard(&temp).await;
        return Err(ExportFault::Write {
            path: target.to_path_buf(),
            source,
        });
    }

    if let Err(source) = make_read_only(&temp).await {
        discard(&temp).await;
        return Err(ExportFault::Write {
            path: target.to_path_buf(),
            source,
        });
    }

    if let Err(source) = tokio::fs::rename(&temp, target).await {
        discard(&temp).await;
        return Err(ExportFault::Rename {
            path: target.to_path_buf(),
            source,
        });
    }

    sync_parent(target).await;
    Ok(())
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

async fn discard(temp: &Path) {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Unable to remove temporary file {}: {e}", temp.display()),
    }
}

/// Handed-off files are read-only to whoever receives them.
#[cfg(unix)]
async fn make_read_only(path: &Path) -> io::Result<()> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, Permissions::from_mode(0o444)).await
}

#[cfg(not(unix))]
async fn make_read_only(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Flushes the directory entry of the rename. Failure only weakens durability, not atomicity.
#[cfg(unix)]
async fn sync_parent(target: &Path) {
    let Some(dir) = target.parent() else {
        return;
    };
    let result = match tokio::fs::File::open(dir).await {
        Ok(d) => d.sync_all().await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!("Unable to sync directory {}: {e}", dir.display());
    }
}

#[cfg(not(unix))]
async fn sync_parent(_target: &Path) {}
