//! Clap derive structures for the `hexdash` CLI.
//!
//! A flat flag set: polling options, per-process control flags, and the
//! usual global knobs. Defaults for the polling options live in
//! `hexdash_config` so a config file or env var can supply them too.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;

/// hexdash -- live terminal dashboard for HexStrike servers
#[derive(Debug, Parser)]
#[command(
    name = "hexdash",
    version,
    about = "HexStrike AI live dashboard monitor",
    long_about = "Polls a HexStrike server and renders system load and running jobs.\n\n\
        Without control flags, runs an auto-refreshing dashboard until Ctrl-C.\n\
        Control flags (--terminate, --pause, --resume, --status) perform one\n\
        action and exit; when several are given, the first of that order wins."
)]
pub struct Cli {
    /// HexStrike API base URL [default: http://localhost:8888]
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Refresh interval in seconds [default: 5]
    #[arg(long, value_name = "SECONDS")]
    pub refresh: Option<u64>,

    /// Run once and exit (no continuous monitoring)
    #[arg(long)]
    pub once: bool,

    /// Append frames instead of clearing the screen between refreshes
    #[arg(long)]
    pub no_clear: bool,

    /// Terminate process with given PID
    #[arg(long, value_name = "PID", help_heading = "Process control")]
    pub terminate: Option<u32>,

    /// Pause process with given PID
    #[arg(long, value_name = "PID", help_heading = "Process control")]
    pub pause: Option<u32>,

    /// Resume process with given PID
    #[arg(long, value_name = "PID", help_heading = "Process control")]
    pub resume: Option<u32>,

    /// Get status of process with given PID
    #[arg(long, value_name = "PID", help_heading = "Process control")]
    pub status: Option<u32>,

    /// Request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k')]
    pub insecure: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "HEXDASH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// When to use color output
    #[arg(long, default_value = "auto")]
    pub color: ColorMode,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if stdout is a terminal and NO_COLOR is unset)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}
