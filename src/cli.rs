//! Command-line interface definition.
//!
//! All argument handling lives here so the rest of the codebase can stay
//! agnostic to the legacy flag syntax.  The surface is four single-dash
//! tokens (`-help`, `-db`, `-srv`, `-full`) inherited from the shell-era
//! invocation of this tool, so they are dispatched by hand rather than
//! through an option parser that would insist on `--` conventions.
//!
//! Dispatch rules, in priority order:
//!
//! 1. Any token outside the recognized set wins immediately: the caller must
//!    report `Unknown argument: {token}` and do nothing else.
//! 2. Zero arguments, or `-help` anywhere, prints usage and exits cleanly.
//! 3. Otherwise the remaining mode flags are collected into a [`Selection`].
//!
//! The selection deliberately does not remember flag order — modes always
//! execute db → srv → full.

/// Exact usage line printed for `-help` or an empty argument list.
pub const USAGE: &str = "Use: backup [-db|-srv|-full]";

/// Which backup modes were requested.  Flags combine freely.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub db: bool,
    pub srv: bool,
    pub full: bool,
}

/// What the process should do, decided purely from the argument list.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    /// Print [`USAGE`] and exit 0.
    Usage,
    /// Print `Unknown argument: {0}` and exit non-zero.
    Unknown(String),
    /// Run the selected backup modes.
    Run(Selection),
}

/// Decide what to do with the raw argument list (program name excluded).
pub fn dispatch<I>(args: I) -> Invocation
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();

    // The first unrecognized token aborts the whole invocation, before any
    // valid flags are acted on.
    for arg in &args {
        if !matches!(arg.as_str(), "-help" | "-db" | "-srv" | "-full") {
            return Invocation::Unknown(arg.clone());
        }
    }

    if args.is_empty() || args.iter().any(|a| a == "-help") {
        return Invocation::Usage;
    }

    Invocation::Run(Selection {
        db: args.iter().any(|a| a == "-db"),
        srv: args.iter().any(|a| a == "-srv"),
        full: args.iter().any(|a| a == "-full"),
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
