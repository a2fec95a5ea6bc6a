use crate::command::CommandLine;
use crate::session::Session;
use anyhow::{Result, anyhow};
use argh::{EarlyExit, FromArgs};
use std::io::Write;
use std::path::PathBuf;

/// Commands interpreted directly by the shell, without forking.
///
/// Built-ins are parsed with [`argh`] (`FromArgs`) and executed in-process.
/// They never touch the recorded termination status; `status` only reads it.
pub(crate) trait Builtin: Sized + FromArgs {
    /// Canonical name, e.g. "cd".
    fn name() -> &'static str;

    /// Execute against the session. Errors are reported to the user by the
    /// dispatcher and never abort the shell.
    fn run(self, stdout: &mut dyn Write, session: &mut Session) -> Result<()>;
}

/// Try the built-ins against the command's first argument, by exact match.
///
/// Returns `Ok(true)` when the command was handled in-process; `Ok(false)`
/// means the caller should launch it as an external program. Usage errors
/// and built-in failures are written to `stdout` and leave the loop running.
pub fn dispatch(
    cmd: &CommandLine,
    stdout: &mut dyn Write,
    session: &mut Session,
) -> Result<bool> {
    Ok(run_if_named::<Exit>(cmd, stdout, session)?
        || run_if_named::<Status>(cmd, stdout, session)?
        || run_if_named::<Cd>(cmd, stdout, session)?)
}

fn run_if_named<T: Builtin>(
    cmd: &CommandLine,
    stdout: &mut dyn Write,
    session: &mut Session,
) -> Result<bool> {
    if cmd.program() != T::name() {
        return Ok(false);
    }
    let argv: Vec<&str> = cmd.arguments().iter().map(String::as_str).collect();
    match T::from_args(&[T::name()], &argv) {
        Ok(builtin) => {
            if let Err(err) = builtin.run(stdout, session) {
                writeln!(stdout, "{err}")?;
            }
        }
        Err(EarlyExit { output, .. }) => writeln!(stdout, "{}", output.trim_end())?,
    }
    Ok(true)
}

#[derive(FromArgs)]
/// Terminate the shell. Outstanding background children are reaped by the
/// operating system when the process exits.
pub struct Exit {}

impl Builtin for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn run(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<()> {
        session.should_exit = true;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Report how the most recently reaped child terminated.
pub struct Status {}

impl Builtin for Status {
    fn name() -> &'static str {
        "status"
    }

    fn run(self, stdout: &mut dyn Write, session: &mut Session) -> Result<()> {
        writeln!(stdout, "{}", session.last_status)?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Change the working directory. Defaults to $HOME when no target is given.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory
    pub target: Option<String>,
}

impl Builtin for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn run(self, stdout: &mut dyn Write, session: &mut Session) -> Result<()> {
        let target = match &self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => session
                .home
                .clone()
                .ok_or_else(|| anyhow!("cd: HOME not set"))?,
        };

        let new_dir = if target.is_absolute() {
            target
        } else {
            session.current_dir.join(target)
        };

        // An invalid target reports and leaves the working directory alone.
        if std::env::set_current_dir(&new_dir).is_err() {
            writeln!(stdout, "{}: directory does not exist", new_dir.display())?;
            return Ok(());
        }
        session.current_dir = std::env::current_dir()?;
        Ok(())
    }
}
