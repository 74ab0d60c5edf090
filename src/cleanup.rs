//! Guarded recursive deletion of run folders.
//!
//! The one defensive check in the whole pipeline: a delete request is only
//! honoured when the target lives under the backup root, so a misconfigured
//! path can never wipe anything outside it.  The check is component-wise
//! (`Path::starts_with`), which also rejects sibling directories that merely
//! share a string prefix with the root.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

/// What a [`remove_tree`] call actually did.
#[derive(Debug, PartialEq, Eq)]
pub enum Removal {
    /// The target existed under the root and was deleted.
    Removed,
    /// The target was outside the backup root; nothing was touched.
    SkippedOutsideRoot,
    /// The target did not exist; nothing to do.
    AlreadyAbsent,
}

/// Recursively delete `target`, but only when it lies under `root`.
///
/// Deleting an already-absent path is not an error — re-running cleanup must
/// be a no-op.  I/O failures during an attempted delete are escalated.
pub fn remove_tree(root: &Path, target: &Path) -> Result<Removal> {
    if !target.starts_with(root) {
        warn!(
            "Refusing to remove {} (outside backup root {})",
            target.display(),
            root.display()
        );
        return Ok(Removal::SkippedOutsideRoot);
    }

    if !target.exists() {
        return Ok(Removal::AlreadyAbsent);
    }

    debug!("Removing {} ...", target.display());
    if target.is_dir() {
        fs::remove_dir_all(target)
            .with_context(|| format!("removing directory {}", target.display()))?;
    } else {
        fs::remove_file(target).with_context(|| format!("removing file {}", target.display()))?;
    }
    Ok(Removal::Removed)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
