use nl_parser::{EmitError, ParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// `const { get } = Ember, x = 1;` and similar. Rewriting it would mean
    /// guessing which declarator to keep, so the file is left alone.
    #[error(
        "{filename}:{line}: destructuring of `{namespace}` shares a statement with {others} other declarator(s); split it into its own `const` first",
        others = .declarators - 1
    )]
    UnsupportedDeclaration {
        filename: String,
        line: usize,
        namespace: String,
        declarators: usize,
    },

    #[error(transparent)]
    Emit(#[from] EmitError),
}
