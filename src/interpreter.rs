use crate::session::Session;
use crate::{builtin, exec, lexer, parser};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

/// The interactive prompt/parse/dispatch loop.
///
/// Owns the [`Session`] state carried across iterations. Each iteration
/// reaps any finished background children, prints the `": "` prompt, reads
/// one line, and either runs a built-in in-process or launches an external
/// program.
pub struct Interpreter {
    session: Session,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
        }
    }

    /// Run the Read-Eval-Print Loop until `exit` or end of input.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = std::io::stdout();

        while !self.session.should_exit {
            exec::reap_background(&mut self.session)?;
            match rl.readline(": ") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    self.interpret(&line, &mut stdout)?;
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    /// Interpret one line of input.
    ///
    /// Blank lines and comments are no-ops. Built-in failures are reported
    /// on `stdout` and keep the loop running; the only errors that escape
    /// here are the ones fatal to the shell itself (fork or wait failing).
    fn interpret(&mut self, line: &str, stdout: &mut dyn Write) -> Result<()> {
        let tokens = lexer::split_into_tokens(line, self.session.pid);
        let Some(cmd) = parser::parse(tokens) else {
            return Ok(());
        };

        if builtin::dispatch(&cmd, stdout, &mut self.session)? {
            return Ok(());
        }

        // Flush before forking so buffered output is not duplicated into
        // the child's copy of the descriptor table.
        stdout.flush()?;
        exec::launch(&cmd, &mut self.session)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
