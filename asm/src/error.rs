use color_print::cprintln;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported architecture: `{0}`")]
    UnsupportedArchitecture(String),

    #[error("Unknown instruction: `{0}`")]
    UnknownInstruction(String),

    #[error("`{op}` takes {expected} operand(s), got {found}")]
    OperandCountMismatch {
        op: String,
        expected: usize,
        found: usize,
    },

    #[error("Operand out of range (0-15): `{0}`")]
    OperandOutOfRange(String),

    #[error("Cannot parse `{0}` as {1}")]
    InvalidOperandFormat(String, String),

    #[error("Re-defined label: `{0}`")]
    DuplicateLabel(String),

    #[error("Undefined label: `{0}`")]
    UnresolvedLabel(String),

    #[error("Macro `{name}` takes {expected} argument(s), got {found}")]
    MacroArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Missing `.endmacro` for macro `{0}`")]
    UnterminatedMacro(String),

    #[error("`.macro` is not allowed inside a macro body")]
    NestedMacro,

    #[error("Macro expansion exceeds depth limit (recursive macro?): `{0}`")]
    MacroDepthExceeded(String),

    #[error("Malformed directive: `{0}`")]
    MalformedDirective(String),
}

/// A fatal diagnostic tied to its 1-based source line.
/// Line 0 means the error concerns the whole unit (e.g. a bad
/// architecture selector, rejected before any line is scanned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub line: usize,
    pub error: Error,
}

impl Diag {
    pub fn new(line: usize, error: Error) -> Self {
        Diag { line, error }
    }

    /// Print with file location and the offending line, rustc style.
    pub fn print(&self, file: &str, lines: &[String]) {
        cprintln!("<red,bold>error</>: {}", self.error);
        if self.line == 0 {
            return;
        }
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, self.line);
        cprintln!("      <blue>|</>");
        let content = lines
            .get(self.line - 1)
            .map(|s| s.as_str())
            .unwrap_or("");
        cprintln!(" <blue>{:>4} |</> {}", self.line, content);
        cprintln!("      <blue>|</>");
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.error)
        } else {
            write!(f, "line {}: {}", self.line, self.error)
        }
    }
}
