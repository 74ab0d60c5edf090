//! `backup` — timestamped host backups driven by `backup.toml`.
//!
//! # Overview
//!
//! This binary replaces a hand-edited backup script with a single tool that
//! snapshots databases, the service directory, or the full filesystem into
//! timestamped `.7z` archives under a backup root, then removes the
//! uncompressed run folder.  Each snapshot is produced by external tools
//! (`mysql`/`mysqldump`, `rsync`, `7z`, `chmod`) that are spawned, waited on,
//! and exit-checked.
//!
//! # Usage
//!
//! ```text
//! backup -db             # dump every database into db/db-<ts>.7z
//! backup -srv            # archive the service directory into srv/srv-<ts>.7z
//! backup -full           # archive the system roots into full/full-<ts>.7z
//! backup -db -srv -full  # all of the above, in that fixed order
//! backup -help           # print usage
//! ```
//!
//! Flags combine freely; modes always execute db → srv → full regardless of
//! the order they were given.  Any other token prints `Unknown argument: …`
//! and nothing else happens.
//!
//! # Module layout
//!
//! | Module      | Responsibility                               |
//! |-------------|----------------------------------------------|
//! | [`cli`]     | Legacy single-dash token dispatcher          |
//! | [`config`]  | `Config` struct + TOML loader                |
//! | [`logging`] | log4rs setup (stdout + append-mode log file) |
//! | [`runner`]  | Argument construction helpers                |
//! | [`ui`]      | Checked execution, stage outcomes, summary   |
//! | [`cleanup`] | Guarded recursive delete                     |
//! | [`modes`]   | The db / srv / full backup stages            |

mod cleanup;
mod cli;
mod config;
mod logging;
mod modes;
mod runner;
mod ui;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use cli::{Invocation, Selection};

fn main() -> ExitCode {
    // Dispatch before touching the filesystem: the help and unknown-argument
    // paths must terminate without creating the log file or the backup root.
    match cli::dispatch(std::env::args().skip(1)) {
        Invocation::Usage => {
            println!("{}", cli::USAGE);
            ExitCode::SUCCESS
        },
        Invocation::Unknown(token) => {
            println!("Unknown argument: {token}");
            ExitCode::FAILURE
        },
        Invocation::Run(selection) => match run(&selection) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e:?}");
                ExitCode::FAILURE
            },
        },
    }
}

/// Load configuration, bring up logging, and run the selected modes.
fn run(selection: &Selection) -> Result<()> {
    let cfg = config::load_config(Path::new("backup.toml"))?;

    logging::init(&cfg.log_file)
        .with_context(|| format!("initialising logging at {}", cfg.log_file.display()))?;

    modes::run(&cfg, selection)
}
