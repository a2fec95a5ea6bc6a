/// One parsed line of input, ready for dispatch.
///
/// Constructed fresh for every loop iteration by the parser and consumed by
/// either the built-in dispatcher or the process launcher in the same
/// iteration. `args[0]` is the program (or built-in) name; the parser never
/// produces a `CommandLine` with an empty argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name followed by its arguments.
    pub args: Vec<String>,
    /// File to open read-only and wire to the child's stdin.
    pub input_path: Option<String>,
    /// File to open write/create/append and wire to the child's stdout.
    pub output_path: Option<String>,
    /// True only when `&` was the final token of the line.
    pub background: bool,
}

impl CommandLine {
    /// The program (or built-in) name.
    pub fn program(&self) -> &str {
        &self.args[0]
    }

    /// Arguments after the program name.
    pub fn arguments(&self) -> &[String] {
        &self.args[1..]
    }
}
