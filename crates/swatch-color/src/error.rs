//! Error types for color expression parsing and evaluation.

use thiserror::Error;

/// Errors produced while parsing or evaluating a color expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// A leaf color (hex, functional literal or bare name) could not be
    /// turned into a color, and no theme color matched it either.
    #[error("Unable to parse color from string: {0}")]
    Unparseable(String),

    /// The expression is not well formed.
    #[error("unexpected {found} at offset {offset} in color expression `{input}`")]
    Syntax {
        /// The full expression being parsed.
        input: String,
        /// Byte offset of the offending text.
        offset: usize,
        /// Description of what was found there.
        found: String,
    },

    /// A `color(...)` modifier name that is not part of the grammar.
    #[error("unknown color modifier `{0}`")]
    UnknownModifier(String),

    /// A modifier received the wrong kind or number of arguments.
    #[error("invalid arguments for `{modifier}`: {message}")]
    InvalidArguments {
        /// Modifier name as written.
        modifier: String,
        /// What was wrong.
        message: String,
    },

    /// Theme colors referencing other theme colors nested too deeply
    /// (usually a reference cycle).
    #[error("color expression nests deeper than {0} levels")]
    TooDeep(usize),

    /// The box-shadow value could not be tokenized into shadow entries.
    #[error("invalid box-shadow `{input}`: {message}")]
    BoxShadow {
        /// The full box-shadow value.
        input: String,
        /// Description from the tokenizer.
        message: String,
    },
}

/// Result type for color operations.
pub type Result<T> = std::result::Result<T, ColorError>;
