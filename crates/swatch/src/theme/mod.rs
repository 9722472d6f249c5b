//! Themes: settings plus the formatters, resolvers and stylers that turn
//! declarations into concrete styles.
//!
//! ## Pipeline
//!
//! For each declaration `prop: value` in a sheet:
//!
//! 1. the value for the current breakpoint is selected
//!    ([`get_responsive_value`](crate::get_responsive_value));
//! 2. the styler registered for `prop` (or the catch-all) runs;
//! 3. the default styler resolves the value (theme keys, scales, colors),
//!    formats it (`8` to `"8px"`) and writes it to its output properties.
//!
//! ## Built-ins
//!
//! | Kind | Names |
//! |------|-------|
//! | formatters | `px`, `em`, `rem`, `ms`, `deg`, `percent` |
//! | resolvers | `themeKey`, `color`, `boxShadow` |
//! | stylers | `catchAll`, `extends`, `face`, `size`, color properties, shadow properties |
//!
//! ## Settings
//!
//! Settings are an ordinary [`StyleSheet`](crate::StyleSheet), usually loaded
//! from YAML or JSON:
//!
//! ```rust
//! use swatch::{StyleSheet, Theme, Value};
//!
//! let settings = StyleSheet::from_yaml(r##"
//! colors:
//!   primary: { values: ["#ddd", "#ccc", "#bbb"], offset: 1 }
//! mixins:
//!   card: { padding: 16px, borderRadius: 4px }
//! "##).unwrap();
//! let theme = Theme::with_settings(settings).unwrap();
//!
//! let sheet = StyleSheet::new().with("extends", "card").with("color", "primary.1");
//! let resolved = theme.resolve_style_sheet(&sheet, 0).unwrap();
//! assert_eq!(resolved.get("padding"), Some(&Value::from("16px")));
//! assert_eq!(resolved.get("color"), Some(&Value::from("rgb(187, 187, 187)")));
//! ```

pub mod builtins;
#[allow(clippy::module_inception)]
mod theme;
pub mod theme_key;

pub use theme::{create_theme, Theme, ThemeOptions, DEFAULT_COLOR_CACHE_SIZE};
