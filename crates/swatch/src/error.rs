//! Error types for theme construction and style resolution.

use swatch_color::ColorError;
use thiserror::Error;

/// Errors raised while building a theme or resolving style sheets.
#[derive(Debug, Error)]
pub enum StyleError {
    /// A styler names a formatter the theme does not define.
    #[error("Formatter \"{0}\" is not defined")]
    FormatterNotDefined(String),

    /// A styler names a resolver the theme does not define.
    #[error("Resolver \"{0}\" is not defined")]
    ResolverNotDefined(String),

    /// A required scale-theme option is missing.
    #[error("Please set up {0}")]
    MissingSetting(&'static str),

    /// A color scale was requested from the theme but is not defined there.
    #[error("Theme color scale \"{0}\" is not defined")]
    MissingScale(String),

    /// A color expression could not be parsed or evaluated.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// Style sheet nesting, mixins or faces recursed too deeply.
    #[error("Style resolution exceeded {0} nested levels")]
    TooDeep(usize),

    /// Settings loaded from a document were not a mapping.
    #[error("Expected a mapping, found {0}")]
    NotAMapping(&'static str),

    /// Scale-theme options were inconsistent.
    #[error("Invalid scale options: {0}")]
    InvalidOptions(String),

    /// A settings file could not be read.
    #[error("Failed to load {path}: {message}")]
    Load { path: String, message: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for swatch operations.
pub type Result<T> = std::result::Result<T, StyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_messages() {
        assert_eq!(
            StyleError::FormatterNotDefined("px".into()).to_string(),
            "Formatter \"px\" is not defined"
        );
        assert_eq!(
            StyleError::ResolverNotDefined("space".into()).to_string(),
            "Resolver \"space\" is not defined"
        );
        assert_eq!(
            StyleError::MissingSetting("baseFontSize").to_string(),
            "Please set up baseFontSize"
        );
    }

    #[test]
    fn color_errors_are_transparent() {
        let err: StyleError = ColorError::Unparseable("asis".into()).into();
        assert_eq!(err.to_string(), "Unable to parse color from string: asis");
    }
}
