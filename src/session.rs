use nix::unistd::Pid;
use std::env as stdenv;
use std::fmt;
use std::path::PathBuf;

/// How the most recently reaped child terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermStatus {
    /// Normal termination with the given exit code.
    Exited(i32),
    /// Termination by the given signal number.
    Signaled(i32),
}

impl Default for TermStatus {
    /// Reported by `status` before any command has run.
    fn default() -> Self {
        TermStatus::Exited(0)
    }
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermStatus::Exited(code) => write!(f, "exited with code {code}"),
            TermStatus::Signaled(sig) => write!(f, "terminated by signal {sig}"),
        }
    }
}

/// Mutable state carried across loop iterations.
///
/// Owned by the interpreter; the `cd` built-in mutates `current_dir`, the
/// reaper mutates `last_status` and `jobs`, and `exit` raises `should_exit`.
#[derive(Debug)]
pub struct Session {
    /// The shell's own pid, captured once at startup for `$$` expansion.
    pub pid: u32,
    /// Termination status of the most recently reaped child.
    pub last_status: TermStatus,
    /// The working directory for command execution.
    pub current_dir: PathBuf,
    /// Background children spawned but not yet reaped.
    pub jobs: Vec<Pid>,
    /// Target of `cd` without an argument, from `$HOME` at startup.
    pub home: Option<PathBuf>,
    /// When set to true, the interactive loop terminates.
    pub should_exit: bool,
}

impl Session {
    /// Capture the current process state into a new `Session`.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            pid: std::process::id(),
            last_status: TermStatus::default(),
            current_dir,
            jobs: Vec::new(),
            home: stdenv::var_os("HOME").map(PathBuf::from),
            should_exit: false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
