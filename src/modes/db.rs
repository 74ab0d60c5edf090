//! Database backup mode (`-db`).
//!
//! Enumerates schema names with `mysql … "SHOW DATABASES;"`, drops the
//! configured exclusions (the MySQL system schemas by default), then dumps
//! each remaining schema with `mysqldump` into `{run folder}/{name}.sql`.
//! Each dump blocks until the child exits and its status is checked — the
//! compression step never starts while a dump is still writing.

use anyhow::{Context, Result};
use log::debug;

use crate::{
    config::Config,
    modes::{self, Mode},
    runner,
    ui::{self, StageOutcome},
};

/// Run the database mode as a stage outcome.
pub fn run(cfg: &Config) -> StageOutcome {
    match try_run(cfg) {
        Ok(()) => StageOutcome::ok("Database backup"),
        Err(e) => StageOutcome::err("Database backup", &e),
    }
}

fn try_run(cfg: &Config) -> Result<()> {
    let folder = modes::create_run_folder(cfg, Mode::Db)?;

    debug!("Downloading databases ...");
    let (stdout, _stderr) = ui::run_checked(&runner::build_list_databases_args(&cfg.db))
        .context("listing databases")?;

    for name in filter_databases(&stdout, &cfg.db.exclude) {
        let dump = folder.join(format!("{name}.sql"));
        debug!("Dumping {name} to {} ...", dump.display());

        ui::run_redirected(&runner::build_dump_args(&cfg.db, &name), &dump)
            .with_context(|| format!("dumping {name}"))?;
    }

    modes::seal(cfg, &folder)
}

/// Split enumeration output into schema names, preserving order, dropping
/// blanks and everything in `exclude`.
fn filter_databases(raw: &str, exclude: &[String]) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !exclude.iter().any(|e| e == line))
        .map(String::from)
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn system_schemas() -> Vec<String> {
        vec!["information_schema".into(), "performance_schema".into()]
    }

    #[test]
    fn exclusions_are_dropped() {
        let raw = "information_schema\nshop\nblog\nperformance_schema\n";
        assert_eq!(
            filter_databases(raw, &system_schemas()),
            vec!["shop", "blog"]
        );
    }

    #[test]
    fn enumeration_order_is_preserved_not_sorted() {
        let raw = "zeta\nalpha\nmiddle\n";
        assert_eq!(
            filter_databases(raw, &[]),
            vec!["zeta", "alpha", "middle"]
        );
    }

    #[test]
    fn blank_lines_and_padding_are_ignored() {
        let raw = "  shop  \n\n\nblog\n   \n";
        assert_eq!(filter_databases(raw, &[]), vec!["shop", "blog"]);
    }

    #[test]
    fn empty_enumeration_yields_no_names() {
        assert!(filter_databases("", &system_schemas()).is_empty());
        assert!(filter_databases("\n\n", &system_schemas()).is_empty());
    }

    #[test]
    fn exclusion_is_exact_match_not_substring() {
        // A user schema that merely contains an excluded name must survive.
        let raw = "information_schema_archive\ninformation_schema\n";
        assert_eq!(
            filter_databases(raw, &system_schemas()),
            vec!["information_schema_archive"]
        );
    }
}
