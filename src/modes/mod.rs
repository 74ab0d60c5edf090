//! The backup pipeline and its shared building blocks.
//!
//! # Pipeline stages (fixed order)
//!
//! | # | Stage           | Flag    | Description                               |
//! |---|-----------------|---------|-------------------------------------------|
//! | 1 | Database backup | `-db`   | Dump every schema, archive, remove folder |
//! | 2 | Service backup  | `-srv`  | rsync the service dir, archive, remove    |
//! | 3 | Full backup     | `-full` | rsync the system roots, archive, remove   |
//! | 4 | Permissions     | —       | `chmod -R 755` on the backup root         |
//!
//! Modes run in this order regardless of flag order on the command line.
//! Every stage's external commands are waited on and exit-checked; the first
//! failed stage aborts the pipeline after the summary banner, so a broken
//! database dump never silently turns into an empty archive.
//!
//! Each mode follows the same snapshot lifecycle, shared here:
//! [`create_run_folder`] → populate → [`seal`] (compress + remove).  The
//! run folder is transient; the `.7z` archive next to it is the only
//! artifact that survives, and nothing in this program ever deletes one.

pub mod db;
pub mod full;
pub mod srv;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::debug;

use crate::{
    cleanup::{self, Removal},
    cli::Selection,
    config::Config,
    runner,
    ui::{self, StageOutcome},
};

// ─── Mode identity ────────────────────────────────────────────────────────────

/// One of the three backup flows.  Determines the subtree under the backup
/// root and the run-folder name prefix (`db/db-<ts>` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Db,
    Srv,
    Full,
}

impl Mode {
    /// Subtree name under the backup root; doubles as the folder prefix.
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Db => "db",
            Self::Srv => "srv",
            Self::Full => "full",
        }
    }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Execute the selected modes in fixed order, then normalise permissions.
///
/// Every stage prints a ✓/✗ line as it finishes and the whole run ends with
/// a summary banner.  A failed stage aborts the pipeline with an error after
/// the summary — later stages do not run against a half-broken root.
pub fn run(cfg: &Config, selection: &Selection) -> Result<()> {
    debug!("---------- START BACKUP ----------");
    println!();

    let mut outcomes: Vec<StageOutcome> = Vec::new();

    // 1. Database
    if selection.db {
        let outcome = db::run(cfg);
        outcome.print();
        let failed = outcome.failed();
        outcomes.push(outcome);
        if failed {
            ui::print_summary(&outcomes);
            bail!("pipeline aborted: database backup failed");
        }
    }

    // 2. Service directory
    if selection.srv {
        let outcome = srv::run(cfg);
        outcome.print();
        let failed = outcome.failed();
        outcomes.push(outcome);
        if failed {
            ui::print_summary(&outcomes);
            bail!("pipeline aborted: service backup failed");
        }
    }

    // 3. Full filesystem
    if selection.full {
        let outcome = full::run(cfg);
        outcome.print();
        let failed = outcome.failed();
        outcomes.push(outcome);
        if failed {
            ui::print_summary(&outcomes);
            bail!("pipeline aborted: full-system backup failed");
        }
    }

    // 4. Permissions — runs whenever the selected modes all succeeded.
    let outcome = finalize(cfg);
    outcome.print();
    let failed = outcome.failed();
    outcomes.push(outcome);
    if failed {
        ui::print_summary(&outcomes);
        bail!("pipeline aborted: permission normalisation failed");
    }

    ui::print_summary(&outcomes);
    debug!("---------- END BACKUP ----------");
    Ok(())
}

// ─── Shared snapshot lifecycle ────────────────────────────────────────────────

/// Create (and return) the run folder `{root}/{mode}/{mode}-{timestamp}`.
///
/// `create_dir_all` also creates the mode subtree on a fresh root.  A second
/// run within the same minute reuses the folder — last writer wins.
pub(crate) fn create_run_folder(cfg: &Config, mode: Mode) -> Result<PathBuf> {
    let folder = cfg
        .root
        .join(mode.dir())
        .join(format!("{}-{}", mode.dir(), runner::timestamp()));

    debug!("Making directory {} ...", folder.display());
    fs::create_dir_all(&folder)
        .with_context(|| format!("creating run folder {}", folder.display()))?;
    Ok(folder)
}

/// Copy `src` into the run folder with rsync, attributes preserved, waiting
/// for completion and checking the exit status.
pub(crate) fn copy_into(src: &Path, folder: &Path) -> Result<()> {
    let dst = format!("{}/.", folder.display());
    let src = src.to_string_lossy();
    debug!("Copying {src} to {dst} ...");

    let args = runner::build_copy_args(&src, &dst, None);
    ui::run_checked(&args).with_context(|| format!("copying {src}"))?;
    Ok(())
}

/// Compress the run folder to `{folder}.7z`, then delete the folder.
///
/// The archive lands next to the folder it replaces, so it is covered by the
/// same mode subtree and the final permission sweep.
pub(crate) fn seal(cfg: &Config, folder: &Path) -> Result<()> {
    let src = folder.to_string_lossy().into_owned();
    let archive = format!("{src}.7z");
    debug!("7z {src} to {archive} ...");

    let args = runner::build_compress_args(&src, &archive);
    ui::run_checked(&args).with_context(|| format!("archiving {src}"))?;

    if cleanup::remove_tree(&cfg.root, folder)? == Removal::SkippedOutsideRoot {
        // Can only happen with a root/folder mismatch in config; the archive
        // is fine, so report rather than fail.
        debug!("Run folder {} left in place by guardrail", folder.display());
    }
    Ok(())
}

// ─── Finalisation ─────────────────────────────────────────────────────────────

/// `chmod -R 755` on the backup root, as a stage outcome.
fn finalize(cfg: &Config) -> StageOutcome {
    match try_finalize(cfg) {
        Ok(()) => StageOutcome::ok("Permissions"),
        Err(e) => StageOutcome::err("Permissions", &e),
    }
}

fn try_finalize(cfg: &Config) -> Result<()> {
    let root = cfg.root.to_string_lossy();
    debug!("chmod -R 755 {root} ...");

    let args = runner::build_chmod_args(&root);
    ui::run_checked(&args).with_context(|| format!("normalising permissions on {root}"))?;
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn cfg_with_root(root: &Path) -> Config {
        Config {
            root: root.to_path_buf(),
            ..Config::default()
        }
    }

    // ── Mode ─────────────────────────────────────────────────────────────────

    #[test]
    fn mode_dirs_match_the_subtree_names() {
        assert_eq!(Mode::Db.dir(), "db");
        assert_eq!(Mode::Srv.dir(), "srv");
        assert_eq!(Mode::Full.dir(), "full");
    }

    // ── create_run_folder ────────────────────────────────────────────────────

    #[test]
    fn run_folder_is_created_under_the_mode_subtree() {
        let root = tempfile::tempdir().unwrap();
        let cfg = cfg_with_root(root.path());

        let folder = create_run_folder(&cfg, Mode::Srv).unwrap();
        assert!(folder.is_dir());
        assert!(folder.starts_with(root.path().join("srv")));

        let name = folder.file_name().unwrap().to_string_lossy().into_owned();
        assert!(
            name.starts_with("srv-"),
            "run folder name '{name}' should carry the mode prefix"
        );
        // srv-2026.08.29-14.05
        assert_eq!(name.len(), "srv-2026.08.29-14.05".len());
    }

    #[test]
    fn same_minute_rerun_reuses_the_folder() {
        let root = tempfile::tempdir().unwrap();
        let cfg = cfg_with_root(root.path());

        let first = create_run_folder(&cfg, Mode::Db).unwrap();
        let second = create_run_folder(&cfg, Mode::Db).unwrap();
        // Minute granularity: back-to-back calls collide by design.
        assert_eq!(first, second);
    }

    // ── copy_into ────────────────────────────────────────────────────────────

    #[test]
    fn copy_into_missing_source_escalates() {
        // rsync (or whatever stands in for it on PATH) must exit non-zero on
        // a nonexistent source, which copy_into turns into an error.
        let root = tempfile::tempdir().unwrap();
        let folder = root.path().join("srv").join("srv-x");
        fs::create_dir_all(&folder).unwrap();

        let missing = root.path().join("no-such-source");
        assert!(copy_into(&missing, &folder).is_err());
    }

    // ── finalize ─────────────────────────────────────────────────────────────

    #[test]
    fn finalize_sets_root_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let sub = root.path().join("db");
        fs::create_dir_all(&sub).unwrap();
        fs::set_permissions(&sub, fs::Permissions::from_mode(0o700)).unwrap();

        let cfg = cfg_with_root(root.path());
        let outcome = finalize(&cfg);
        assert!(!outcome.failed(), "chmod stage failed: {:?}", outcome.error);

        let mode = fs::metadata(&sub).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }
}
