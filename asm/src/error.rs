use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot parse `{0}` as an integer literal")]
    BadLiteral(String),

    #[error("Invalid register: `{0}`")]
    BadRegister(String),

    #[error("Invalid register pair: `{0}`")]
    BadRegisterPair(String),

    #[error("Invalid dword immediate: `{0}`")]
    BadDword(String),

    #[error("Relative displacement out of range: `{0}`")]
    BadRelative(String),

    #[error("No instruction matches `{mnemonic}` with operands [{operands}]")]
    NoMatch { mnemonic: String, operands: String },

    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("Label name exceeds 32 characters: `{0}`")]
    LabelTooLong(String),

    #[error("Invalid origin: `{0}`")]
    BadOrigin(String),

    #[error("Cannot parse string literal")]
    BadString,

    #[error("String literal exceeds 64 characters (got {0})")]
    StringTooLong(usize),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    /// Attach the source line this error was detected on.
    pub fn at(self, line: usize, raw: &str) -> Located {
        Located { kind: self, line, raw: raw.to_string() }
    }
}

/// An assembly error pinned to its source line. `line` is 0-based.
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct Located {
    pub kind: Error,
    pub line: usize,
    pub raw: String,
}

impl Located {
    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str) {
        cprintln!("<red,bold>error</>: {}", self.kind);

        // line is 0-based, display as 1-based
        let line_num = self.line + 1;
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", line_num, self.raw);
        cprintln!("      <blue>|</>");
    }
}
