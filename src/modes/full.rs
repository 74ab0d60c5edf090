//! Full-system backup mode (`-full`).
//!
//! Copies the configured top-level filesystem roots (eleven by default, from
//! `/bin` through `/var`) into one run folder, a separate rsync invocation
//! per root, each completing — and passing its exit-status check — before
//! the next starts.  Then compress and remove, like the other modes.

use anyhow::{Context, Result};

use crate::{
    config::Config,
    modes::{self, Mode},
    ui::StageOutcome,
};

/// Run the full-system mode as a stage outcome.
pub fn run(cfg: &Config) -> StageOutcome {
    match try_run(cfg) {
        Ok(()) => StageOutcome::ok("Full-system backup"),
        Err(e) => StageOutcome::err("Full-system backup", &e),
    }
}

fn try_run(cfg: &Config) -> Result<()> {
    let folder = modes::create_run_folder(cfg, Mode::Full)?;

    for source in &cfg.full.sources {
        modes::copy_into(source, &folder)
            .with_context(|| format!("copying system root {}", source.display()))?;
    }

    modes::seal(cfg, &folder)
}
