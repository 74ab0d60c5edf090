//! Run journal — an append-only log file mirrored to stdout.
//!
//! Every operation logs its intent (`Making directory …`, `Copying … to …`)
//! before executing, so the journal doubles as an audit trail of what each
//! run attempted.  Lines are `{timestamp}:{level}:{message}` in both sinks,
//! which keeps existing log-scraping tooling for this format working.
//!
//! Initialisation is deliberately deferred until a backup is actually going
//! to run: opening the log file creates it, and the help / unknown-argument
//! paths must not mutate the filesystem at all.

use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

/// Log line layout shared by the console and file appenders.
const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)}:{l}:{m}{n}";

/// Install the global logger: stdout plus an append-mode file at `log_file`.
///
/// The parent directory must already exist; the file itself is created on
/// first use and appended to on every subsequent run.
pub fn init(log_file: &Path) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .target(Target::Stdout)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .append(true)
        .build(log_file)
        .with_context(|| format!("opening log file {}", log_file.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(LevelFilter::Debug),
        )
        .context("assembling log4rs config")?;

    log4rs::init_config(config).context("installing global logger")?;
    Ok(())
}
