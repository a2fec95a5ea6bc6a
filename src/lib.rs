//! A minimal interactive command shell.
//!
//! The shell reads one line at a time, interprets three built-ins (`exit`,
//! `status`, `cd`) in-process, and launches everything else as an external
//! program via fork/exec, with optional `< file` / `> file` redirection and
//! a trailing `&` for background execution. The only expansion performed is
//! `$$`, replaced with the shell's own process id.
//!
//! The main entry point is [`Interpreter`], whose `repl` method runs the
//! prompt loop. The [`command`] and [`session`] modules expose the parsed
//! command record and the per-session state for embedding or testing.

mod builtin;
pub mod command;
mod exec;
mod interpreter;
mod lexer;
mod parser;
pub mod session;

pub use interpreter::Interpreter;
