//! Service-directory backup mode (`-srv`).
//!
//! One rsync of the configured service directory into the run folder —
//! permissions, ACLs and extended attributes preserved, no exclusions —
//! then compress and remove.

use anyhow::Result;

use crate::{
    config::Config,
    modes::{self, Mode},
    ui::StageOutcome,
};

/// Run the service-directory mode as a stage outcome.
pub fn run(cfg: &Config) -> StageOutcome {
    match try_run(cfg) {
        Ok(()) => StageOutcome::ok("Service backup"),
        Err(e) => StageOutcome::err("Service backup", &e),
    }
}

fn try_run(cfg: &Config) -> Result<()> {
    let folder = modes::create_run_folder(cfg, Mode::Srv)?;
    modes::copy_into(&cfg.srv.source, &folder)?;
    modes::seal(cfg, &folder)
}
