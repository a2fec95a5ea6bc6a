//! Launching external programs and reaping their children.
//!
//! The launcher forks; the child wires any redirections onto its own
//! stdin/stdout with `dup2` and then replaces its image with `execvp`, so
//! the parent's descriptors are never touched. The parent blocks on
//! foreground children and polls background children with `WNOHANG`.

use crate::command::CommandLine;
use crate::session::{Session, TermStatus};
use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, dup2, execvp, fork};
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::process;

/// Child exit code for a failed redirection (open or descriptor copy).
const EXIT_REDIRECT: i32 = 1;
/// Child exit code for a failed exec (program missing or not executable).
const EXIT_EXEC: i32 = 2;

/// Fork and run `cmd` as an external program.
///
/// Foreground commands block until the child terminates and record its
/// status in the session. Background commands report the spawned pid, poll
/// once without blocking, and are otherwise left to [`reap_background`].
///
/// A failure to fork is fatal to the shell; everything that goes wrong
/// after the fork is fatal only to the child, whose status the parent
/// observes through the reap.
pub fn launch(cmd: &CommandLine, session: &mut Session) -> Result<()> {
    match unsafe { fork() }.context("failed to fork")? {
        ForkResult::Child => exec_child(cmd),
        ForkResult::Parent { child } => {
            if cmd.background {
                println!("background pid is {child}");
                poll_job(child, session)?;
            } else {
                session.last_status = wait_foreground(child)?;
            }
            Ok(())
        }
    }
}

/// Poll every outstanding background child once, without blocking.
///
/// Called before each prompt so completed background children are reaped
/// and reported instead of lingering as zombies. Each completion updates
/// the recorded termination status.
pub fn reap_background(session: &mut Session) -> Result<()> {
    for pid in std::mem::take(&mut session.jobs) {
        poll_job(pid, session)?;
    }
    Ok(())
}

fn poll_job(pid: Pid, session: &mut Session) -> Result<()> {
    match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
        Ok(status) => match decode(status) {
            Some(term) => {
                println!("background pid {pid} is done: {term}");
                session.last_status = term;
            }
            None => session.jobs.push(pid),
        },
        // Already reaped; nothing left to record.
        Err(Errno::ECHILD) => {}
        Err(err) => return Err(err).context("failed to wait for background child"),
    }
    Ok(())
}

/// Block until the given child terminates.
fn wait_foreground(child: Pid) -> Result<TermStatus> {
    loop {
        let status = waitpid(child, None).context("failed to wait for child")?;
        if let Some(term) = decode(status) {
            return Ok(term);
        }
    }
}

fn decode(status: WaitStatus) -> Option<TermStatus> {
    match status {
        WaitStatus::Exited(_, code) => Some(TermStatus::Exited(code)),
        WaitStatus::Signaled(_, signal, _) => Some(TermStatus::Signaled(signal as i32)),
        _ => None,
    }
}

/// Child side of the fork: wire redirections, then replace the image.
///
/// Never returns; any failure prints a diagnostic and terminates the child
/// with a code distinct per failure category. Rust opens files with
/// `O_CLOEXEC`, so the original descriptors vanish at exec while the
/// `dup2` copies on stdin/stdout survive it.
fn exec_child(cmd: &CommandLine) -> ! {
    if let Some(path) = &cmd.input_path {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => fail_child(&format!("cannot open {path} for input: {err}")),
        };
        if let Err(err) = dup2(file.as_raw_fd(), STDIN_FILENO) {
            fail_child(&format!("cannot redirect input from {path}: {err}"));
        }
    }

    if let Some(path) = &cmd.output_path {
        let file = match OpenOptions::new()
            .write(true)
            .create(true)
            .append(true)
            .mode(0o660)
            .open(path)
        {
            Ok(file) => file,
            Err(err) => fail_child(&format!("cannot open {path} for output: {err}")),
        };
        if let Err(err) = dup2(file.as_raw_fd(), STDOUT_FILENO) {
            fail_child(&format!("cannot redirect output to {path}: {err}"));
        }
    }

    let args: Vec<CString> = match cmd
        .args
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect()
    {
        Ok(args) => args,
        Err(_) => exec_failed(cmd.program()),
    };

    // Only returns on failure.
    let _ = execvp(&args[0], &args);
    exec_failed(cmd.program())
}

fn fail_child(message: &str) -> ! {
    let _ = writeln!(std::io::stderr(), "{message}");
    process::exit(EXIT_REDIRECT)
}

fn exec_failed(program: &str) -> ! {
    let _ = writeln!(
        std::io::stderr(),
        "{program}: no such file or directory"
    );
    process::exit(EXIT_EXEC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn sh(script: &str) -> CommandLine {
        CommandLine {
            args: vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()],
            input_path: None,
            output_path: None,
            background: false,
        }
    }

    #[test]
    fn foreground_records_exit_code() {
        let mut session = Session::new();
        launch(&sh("exit 3"), &mut session).unwrap();
        assert_eq!(session.last_status, TermStatus::Exited(3));
    }

    #[test]
    fn foreground_records_terminating_signal() {
        let mut session = Session::new();
        launch(&sh("kill -9 $$"), &mut session).unwrap();
        assert_eq!(session.last_status, TermStatus::Signaled(9));
    }

    #[test]
    fn exec_failure_is_fatal_only_to_the_child() {
        let mut session = Session::new();
        let cmd = CommandLine {
            args: vec!["smallsh_no_such_program".to_string()],
            input_path: None,
            output_path: None,
            background: false,
        };
        launch(&cmd, &mut session).unwrap();
        assert_eq!(session.last_status, TermStatus::Exited(EXIT_EXEC));
    }

    #[test]
    fn missing_input_file_is_fatal_only_to_the_child() {
        let mut session = Session::new();
        let cmd = CommandLine {
            args: vec!["/bin/cat".to_string()],
            input_path: Some("/nonexistent_smallsh_input".to_string()),
            output_path: None,
            background: false,
        };
        launch(&cmd, &mut session).unwrap();
        assert_eq!(session.last_status, TermStatus::Exited(EXIT_REDIRECT));
    }

    #[test]
    fn redirection_round_trip_appends_and_creates() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let copy = dir.path().join("copy.txt");
        let mut session = Session::new();

        let echo = CommandLine {
            args: vec!["/bin/echo".to_string(), "hello".to_string()],
            input_path: None,
            output_path: Some(out.display().to_string()),
            background: false,
        };
        launch(&echo, &mut session).unwrap();
        // Run again: output redirection appends instead of truncating.
        launch(&echo, &mut session).unwrap();
        assert_eq!(session.last_status, TermStatus::Exited(0));

        let cat = CommandLine {
            args: vec!["/bin/cat".to_string()],
            input_path: Some(out.display().to_string()),
            output_path: Some(copy.display().to_string()),
            background: false,
        };
        launch(&cat, &mut session).unwrap();

        assert_eq!(std::fs::read_to_string(&copy).unwrap(), "hello\nhello\n");
    }

    #[test]
    fn foreground_blocks_until_the_child_exits() {
        let mut session = Session::new();
        let start = Instant::now();
        launch(&sh("sleep 0.3"), &mut session).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert_eq!(session.last_status, TermStatus::Exited(0));
    }

    #[test]
    fn background_returns_immediately_and_is_reaped_later() {
        let mut session = Session::new();
        let mut cmd = sh("sleep 0.2; exit 7");
        cmd.background = true;

        let start = Instant::now();
        launch(&cmd, &mut session).unwrap();
        assert!(start.elapsed() < Duration::from_millis(150));
        assert_eq!(session.jobs.len(), 1);
        // Not yet reaped: the recorded status is untouched.
        assert_eq!(session.last_status, TermStatus::Exited(0));

        let deadline = Instant::now() + Duration::from_secs(5);
        while !session.jobs.is_empty() {
            assert!(Instant::now() < deadline, "background child never reaped");
            std::thread::sleep(Duration::from_millis(20));
            reap_background(&mut session).unwrap();
        }
        assert_eq!(session.last_status, TermStatus::Exited(7));
    }
}
