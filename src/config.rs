//! Configuration types and loading logic.
//!
//! `Config` is a direct 1-to-1 mapping of `backup.toml`.  Every field has a
//! default that reproduces the constants of the shell-era script this tool
//! replaces, so the file is entirely optional — running `backup` without one
//! targets `/srv/backups/linux` and the stock source paths.
//!
//! # File format
//!
//! ```toml
//! root     = "/srv/backups/linux"   # archives land under here
//! log_file = "/var/log/backup.log"  # append-only run journal
//!
//! [db]
//! login_path = "backup"             # mysql --login-path=<…>
//! exclude    = ["information_schema", "performance_schema"]
//!
//! [srv]
//! source = "/srv"
//!
//! [full]
//! sources = ["/bin", "/etc", "/opt", "/boot", "/home", "/lib",
//!            "/sbin", "/usr", "/lib64", "/root", "/var"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ─── Top-level ────────────────────────────────────────────────────────────────

/// Root configuration object, deserialised from `backup.toml`.
///
/// All sections are optional; missing sections fall back to their `Default`
/// implementations.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Backup root.  Run folders and archives live in `db/`, `srv/` and
    /// `full/` subtrees underneath it, and the final `chmod -R 755` is
    /// applied to it.  Also the guardrail prefix for recursive deletion.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Append-only log file, mirrored to stdout.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Database mode (`-db`) settings.
    #[serde(default)]
    pub db: DbConfig,

    /// Service-directory mode (`-srv`) settings.
    #[serde(default)]
    pub srv: SrvConfig,

    /// Full-system mode (`-full`) settings.
    #[serde(default)]
    pub full: FullConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            log_file: default_log_file(),
            db: DbConfig::default(),
            srv: SrvConfig::default(),
            full: FullConfig::default(),
        }
    }
}

// ─── [db] ─────────────────────────────────────────────────────────────────────

/// Settings for the database backup mode.
#[derive(Debug, Deserialize, Serialize)]
pub struct DbConfig {
    /// Pre-authenticated credential profile passed to both `mysql` and
    /// `mysqldump` as `--login-path=<…>` (set up once with
    /// `mysql_config_editor`), so no password ever appears in this file.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Schema names never dumped.  The defaults are the two MySQL system
    /// schemas; add application schemas here to skip them too.
    #[serde(default = "default_db_exclude")]
    pub exclude: Vec<String>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            exclude: default_db_exclude(),
        }
    }
}

// ─── [srv] ────────────────────────────────────────────────────────────────────

/// Settings for the service-directory backup mode.
#[derive(Debug, Deserialize, Serialize)]
pub struct SrvConfig {
    /// Directory copied (recursively, attributes preserved) into the run
    /// folder.  No exclusions are applied.
    #[serde(default = "default_srv_source")]
    pub source: PathBuf,
}

impl Default for SrvConfig {
    fn default() -> Self {
        Self {
            source: default_srv_source(),
        }
    }
}

// ─── [full] ───────────────────────────────────────────────────────────────────

/// Settings for the full-system backup mode.
#[derive(Debug, Deserialize, Serialize)]
pub struct FullConfig {
    /// Top-level filesystem roots copied into the run folder, one rsync
    /// invocation each, strictly in this order.
    #[serde(default = "default_full_sources")]
    pub sources: Vec<PathBuf>,
}

impl Default for FullConfig {
    fn default() -> Self {
        Self {
            sources: default_full_sources(),
        }
    }
}

// ─── Defaults ─────────────────────────────────────────────────────────────────

// These free functions are required by `#[serde(default = "…")]` — serde
// cannot call `Default::default()` for individual fields, only for whole
// structs.

pub fn default_root() -> PathBuf {
    PathBuf::from("/srv/backups/linux")
}

pub fn default_log_file() -> PathBuf {
    PathBuf::from("/var/log/backup.log")
}

pub fn default_login_path() -> String {
    "backup".into()
}

pub fn default_db_exclude() -> Vec<String> {
    vec!["information_schema".into(), "performance_schema".into()]
}

pub fn default_srv_source() -> PathBuf {
    PathBuf::from("/srv")
}

pub fn default_full_sources() -> Vec<PathBuf> {
    [
        "/bin", "/etc", "/opt", "/boot", "/home", "/lib", "/sbin", "/usr", "/lib64", "/root",
        "/var",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// Read and parse a `Config` from `path`.
///
/// If the file does not exist, a warning is printed to `stderr` and a
/// fully-defaulted `Config` is returned.  This keeps the cron-job invocation
/// working without any file on disk.
///
/// Returns an error if the file exists but cannot be read or is not valid
/// TOML.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        eprintln!(
            "Warning: config file '{}' not found, using built-in defaults.",
            path.display()
        );
        return Ok(Config::default());
    }

    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
