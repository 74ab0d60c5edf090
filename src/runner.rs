//! Command argument construction helpers.
//!
//! This module is responsible for *building* the argument lists that will be
//! passed to the external tools.  It deliberately does **not** execute
//! anything — process execution lives in [`crate::ui`].
//!
//! Keeping arg-building separate from execution means every function here is
//! pure and trivially unit-testable without spawning any child processes.
//!
//! # Tool inventory
//!
//! | Tool        | Used for                                           |
//! |-------------|----------------------------------------------------|
//! | `rsync`     | Recursive, attribute-preserving copy (`-aAXv`)     |
//! | `7z`        | Archiving a run folder (`7z a ARCHIVE SRC`)        |
//! | `mysql`     | Enumerating schema names (`SHOW DATABASES;`)       |
//! | `mysqldump` | Dumping one schema to SQL (stdout → `{name}.sql`)  |
//! | `chmod`     | Normalising backup-root permissions (`-R 755`)     |

use chrono::Local;

use crate::config::DbConfig;

// ─── Timestamp ────────────────────────────────────────────────────────────────

/// Minute-granularity run stamp, e.g. `2026.08.29-14.05`.
///
/// Two runs of the same mode within one minute share a run folder; the later
/// archive overwrites the earlier one.  Accepted hazard, not a guarantee.
pub fn timestamp() -> String {
    Local::now().format("%Y.%m.%d-%H.%M").to_string()
}

// ─── Copy ─────────────────────────────────────────────────────────────────────

/// Arguments for a recursive attribute-preserving copy of `src` into `dst`,
/// optionally excluding one path pattern:
///
/// ```text
/// rsync -aAXv SRC DST [--exclude PATTERN]
/// ```
///
/// `-aAX` keeps permissions, ACLs and extended attributes; `v` feeds the
/// captured output that is replayed when a copy fails.
pub fn build_copy_args(src: &str, dst: &str, exclude: Option<&str>) -> Vec<String> {
    let mut cmd: Vec<String> = vec!["rsync".into(), "-aAXv".into(), src.into(), dst.into()];
    if let Some(pattern) = exclude {
        cmd.extend(["--exclude".into(), pattern.into()]);
    }
    cmd
}

// ─── Compress ─────────────────────────────────────────────────────────────────

/// Arguments for `7z a ARCHIVE SRC` — appends the run folder into the named
/// archive file.
pub fn build_compress_args(src: &str, archive: &str) -> Vec<String> {
    vec!["7z".into(), "a".into(), archive.into(), src.into()]
}

// ─── Database enumeration & dump ──────────────────────────────────────────────

/// Arguments for listing every schema name, one per line, no header row:
///
/// ```text
/// mysql --login-path=<…> --batch --skip-column-names -e "SHOW DATABASES;"
/// ```
///
/// Exclusions are applied by the caller, in enumeration order.
pub fn build_list_databases_args(db: &DbConfig) -> Vec<String> {
    vec![
        "mysql".into(),
        format!("--login-path={}", db.login_path),
        "--batch".into(),
        "--skip-column-names".into(),
        "-e".into(),
        "SHOW DATABASES;".into(),
    ]
}

/// Arguments for dumping one schema.  stdout is redirected to the target
/// `.sql` file by the executor; `--force` lets the dump continue past
/// per-object errors so one broken view does not empty the whole file.
pub fn build_dump_args(db: &DbConfig, name: &str) -> Vec<String> {
    vec![
        "mysqldump".into(),
        format!("--login-path={}", db.login_path),
        "--force".into(),
        "--opt".into(),
        "--databases".into(),
        name.into(),
    ]
}

// ─── Permissions ──────────────────────────────────────────────────────────────

/// Arguments for `chmod -R 755 ROOT` — owner rwx, group/other rx, applied to
/// the whole backup root after every run.
pub fn build_chmod_args(root: &str) -> Vec<String> {
    vec!["chmod".into(), "-R".into(), "755".into(), root.into()]
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn db_cfg(login_path: &str) -> DbConfig {
        DbConfig {
            login_path: login_path.into(),
            exclude: vec![],
        }
    }

    // ── timestamp ─────────────────────────────────────────────────────────────

    #[test]
    fn timestamp_has_minute_granularity_layout() {
        let ts = timestamp();
        // 2026.08.29-14.05 — parse it back with the same format string.
        chrono::NaiveDateTime::parse_from_str(&ts, "%Y.%m.%d-%H.%M")
            .unwrap_or_else(|e| panic!("timestamp '{ts}' does not round-trip: {e}"));
        assert_eq!(ts.len(), "2026.08.29-14.05".len());
    }

    // ── build_copy_args ───────────────────────────────────────────────────────

    #[test]
    fn copy_args_without_exclude() {
        let cmd = build_copy_args("/srv", "/tmp/run/.", None);
        assert_eq!(cmd, vec!["rsync", "-aAXv", "/srv", "/tmp/run/."]);
    }

    #[test]
    fn copy_args_with_exclude_appends_pattern() {
        let cmd = build_copy_args("/srv", "/tmp/run/.", Some("cache/"));
        assert_eq!(cmd[4], "--exclude");
        assert_eq!(cmd[5], "cache/");
    }

    #[test]
    fn copy_args_preserve_paths_with_spaces() {
        let cmd = build_copy_args("/srv/my data", "/tmp/run dir/.", None);
        assert_eq!(cmd[2], "/srv/my data");
        assert_eq!(cmd[3], "/tmp/run dir/.");
    }

    // ── build_compress_args ───────────────────────────────────────────────────

    #[test]
    fn compress_args_archive_before_source() {
        let cmd = build_compress_args("/b/db/db-x", "/b/db/db-x.7z");
        assert_eq!(cmd, vec!["7z", "a", "/b/db/db-x.7z", "/b/db/db-x"]);
    }

    // ── build_list_databases_args / build_dump_args ───────────────────────────

    #[test]
    fn list_args_use_login_path_and_skip_header() {
        let cmd = build_list_databases_args(&db_cfg("nightly"));
        assert_eq!(cmd[1], "--login-path=nightly");
        assert!(cmd.contains(&"--skip-column-names".to_string()));
        assert_eq!(cmd.last().unwrap(), "SHOW DATABASES;");
    }

    #[test]
    fn dump_args_target_one_database() {
        let cmd = build_dump_args(&db_cfg("backup"), "shop");
        assert_eq!(cmd.last().unwrap(), "shop");
        assert!(cmd.contains(&"--force".to_string()));
        assert!(cmd.contains(&"--opt".to_string()));
    }

    // ── build_chmod_args ──────────────────────────────────────────────────────

    #[test]
    fn chmod_args_are_recursive_755() {
        let cmd = build_chmod_args("/srv/backups/linux");
        assert_eq!(cmd, vec!["chmod", "-R", "755", "/srv/backups/linux"]);
    }

    // ── insta snapshots ───────────────────────────────────────────────────────
    // Lock down the exact argument vectors so any unintended change is
    // immediately visible in the diff.

    #[test]
    fn snapshot_copy_args() {
        insta::assert_debug_snapshot!(build_copy_args("/srv", "/b/srv/srv-x/.", None), @r#"
        [
            "rsync",
            "-aAXv",
            "/srv",
            "/b/srv/srv-x/.",
        ]
        "#);
    }

    #[test]
    fn snapshot_dump_args() {
        insta::assert_debug_snapshot!(build_dump_args(&db_cfg("backup"), "shop"), @r#"
        [
            "mysqldump",
            "--login-path=backup",
            "--force",
            "--opt",
            "--databases",
            "shop",
        ]
        "#);
    }
}
