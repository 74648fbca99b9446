use thiserror::Error;

/// The source text is not a valid module.
#[derive(Debug, Error)]
#[error("{filename}:{line}:{column}: {message}")]
pub struct ParseError {
    pub filename: String,
    /// 1-based.
    pub line: usize,
    /// 0-based, in characters.
    pub column: usize,
    pub message: String,
}

/// Rendering a module back to text failed.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write generated code: {0}")]
    Io(#[from] std::io::Error),
    #[error("generated code is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
