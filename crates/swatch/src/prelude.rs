//! Common imports for building themes and resolving sheets.
//!
//! ```rust
//! use swatch::prelude::*;
//!
//! let theme = Theme::with_settings(StyleSheet::new()).unwrap();
//! let resolved = theme.resolve_style_sheet(&StyleSheet::new().with("width", "100%"), 0).unwrap();
//! assert_eq!(resolved.get("width"), Some(&Value::from("100%")));
//! ```

pub use crate::context::Context;
pub use crate::error::{Result, StyleError};
pub use crate::styler::{Resolution, Styled, StylerSpec};
pub use crate::theme::{create_theme, Theme, ThemeOptions};
pub use crate::value::{SheetList, StyleSheet, Value};
pub use crate::Scale;
