//! Error types for dotkit.

/// Error type for every library operation.
#[derive(Debug, thiserror::Error)]
pub enum DotError {
    /// Wrong kind of value handed to a model mutation.
    #[error("type error: expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    /// Malformed DOT text.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Input bytes are not valid in the declared charset.
    #[error("cannot decode input as {charset}: invalid byte at offset {offset}")]
    Decode { charset: &'static str, offset: usize },

    /// Output text holds a character the declared charset cannot represent.
    #[error("cannot encode {ch:?} as {charset}")]
    Encode { charset: &'static str, ch: char },

    #[error("unknown charset: {0}")]
    UnknownCharset(String),

    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    /// The external renderer is missing, not executable, timed out or failed.
    #[error("{program}: {message}")]
    Invocation {
        program: String,
        message: String,
        /// Diagnostic output captured from the process, if any.
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for dotkit operations
pub type Result<T> = std::result::Result<T, DotError>;

impl DotError {
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn invocation(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            program: program.into(),
            message: message.into(),
            stderr: String::new(),
        }
    }

    /// True for errors caused by malformed or undecodable input text.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Decode { .. })
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::Invocation { .. })
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type { .. })
    }
}
