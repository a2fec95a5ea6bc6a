//! Turns a token stream into a [`CommandLine`] record.
//!
//! The grammar is flat: words, `< path`, `> path`, and a trailing `&`.
//! Redirect operators and arguments may interleave in any order; the last
//! occurrence of a redirect wins. There is no AST because there is nothing
//! to nest.

use crate::command::CommandLine;
use crate::lexer::Token;

/// Documented design limit on the number of arguments per line.
pub const MAX_ARGS: usize = 512;

/// Build a [`CommandLine`] from the tokens of one input line.
///
/// Returns `None` when there is nothing to run: the line was blank, a
/// comment (first word starts with `#`), or held only operators. Policy
/// decisions baked in here:
///
/// - `&` makes the command a background command only as the *final* token;
///   anywhere else it is dropped from the argument vector.
/// - A redirect operator with no word after it is ignored rather than
///   treated as an error.
/// - Hitting the [`MAX_ARGS`] cap prints a warning and stops parsing,
///   keeping the arguments collected so far.
pub fn parse(tokens: Vec<Token>) -> Option<CommandLine> {
    if let Some(Token::Word(first)) = tokens.first() {
        if first.starts_with('#') {
            return None;
        }
    }

    let mut args = Vec::new();
    let mut input_path = None;
    let mut output_path = None;
    let mut background = false;

    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        match token {
            Token::Word(word) => {
                if args.len() >= MAX_ARGS {
                    eprintln!("there is a max of {MAX_ARGS} arguments");
                    break;
                }
                args.push(word);
            }
            Token::RedirectIn => {
                if let Some(Token::Word(_)) = iter.peek() {
                    if let Some(Token::Word(path)) = iter.next() {
                        input_path = Some(path);
                    }
                }
            }
            Token::RedirectOut => {
                if let Some(Token::Word(_)) = iter.peek() {
                    if let Some(Token::Word(path)) = iter.next() {
                        output_path = Some(path);
                    }
                }
            }
            // Honored only in final position; reset by any later token.
            Token::Ampersand => background = iter.peek().is_none(),
        }
    }

    if args.is_empty() {
        return None;
    }

    Some(CommandLine {
        args,
        input_path,
        output_path,
        background,
    })
}
