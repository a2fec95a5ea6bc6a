//! Lexical analysis for the shell's input language.
//!
//! The language is deliberately tiny: tokens are separated by runs of
//! whitespace, and a token is special only when it is *exactly* `<`, `>` or
//! `&`. There is no quoting or escaping, so `a<b` is one ordinary word.
//! The only expansion is the `$$` marker, which is replaced with the
//! shell's own process id while the word is lexed.

/// A token produced from one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An ordinary word, with `$$` already expanded.
    Word(String),
    /// Input redirection, `<`.
    RedirectIn,
    /// Output redirection, `>`.
    RedirectOut,
    /// Background marker, `&`.
    Ampersand,
}

/// Split one line (trailing newline already stripped) into tokens.
///
/// `shell_pid` is substituted for every non-overlapping `$$` pair inside a
/// word, scanned left to right; a lone `$` is kept as-is. A blank line
/// yields an empty token stream.
pub fn split_into_tokens(line: &str, shell_pid: u32) -> Vec<Token> {
    line.split_whitespace()
        .map(|tok| match tok {
            "<" => Token::RedirectIn,
            ">" => Token::RedirectOut,
            "&" => Token::Ampersand,
            word => Token::Word(expand_pid(word, shell_pid)),
        })
        .collect()
}

/// Replace every non-overlapping `$$` with the decimal form of `pid`.
fn expand_pid(word: &str, pid: u32) -> String {
    if !word.contains("$$") {
        return word.to_string();
    }
    word.replace("$$", &pid.to_string())
}
