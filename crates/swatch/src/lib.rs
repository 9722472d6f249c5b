//! # Swatch - themeable style sheet resolution
//!
//! Swatch turns declarative style sheets into flat, concrete style maps for
//! a given theme and breakpoint. A style sheet maps property names to values
//! that may be:
//!
//! - theme keys and scale positions (`fontFamily: body`, `m: 2`)
//! - color expressions (`color: "color(primary.1 alpha(50%))"`)
//! - responsive arrays indexed by breakpoint (`width: ["100%", null, "50%"]`)
//! - nested selector blocks (`"&:hover": { ... }`)
//!
//! ## Quick Start
//!
//! ```rust
//! use swatch::{StyleSheet, StylerSpec, ThemeOptions, Value};
//!
//! let settings = StyleSheet::from_yaml(r##"
//! colors:
//!   primary: { values: ["#ddd", "#ccc", "#bbb"], offset: 1 }
//! space: { values: [0, 4, 8, 16], offset: 0 }
//! "##).unwrap();
//!
//! let theme = ThemeOptions::new()
//!     .settings(settings)
//!     .resolver("space", |_, value, ctx| {
//!         Ok(swatch::lookup_theme_key(ctx.settings(), "space", value).unwrap_or_else(|| value.clone()))
//!     })
//!     .styler("mx", StylerSpec::new().resolver("space").format("px").output_props(["marginLeft", "marginRight"]))
//!     .build()
//!     .unwrap();
//!
//! let sheet = StyleSheet::new()
//!     .with("color", "primary.-1")
//!     .with("mx", Value::responsive([Some(1.into()), Some(3.into())]));
//!
//! let small = theme.resolve_style_sheet(&sheet, 0).unwrap();
//! assert_eq!(small.get("color"), Some(&Value::from("rgb(221, 221, 221)")));
//! assert_eq!(small.get("marginLeft"), Some(&Value::from("4px")));
//!
//! let large = theme.resolve_style_sheet(&sheet, 1).unwrap();
//! assert_eq!(large.get("marginRight"), Some(&Value::from("16px")));
//! ```
//!
//! ## Modules
//!
//! | Area | Entry points |
//! |------|--------------|
//! | values | [`Value`], [`StyleSheet`], [`SheetList`], [`Scale`] |
//! | lookups | [`get_scale_value`], [`get_responsive_value`], [`lookup_theme_key`] |
//! | merging | [`depth_first_object_merge`] |
//! | themes | [`ThemeOptions`], [`create_theme`], [`Theme`] |
//! | resolution | [`resolve_style_sheet`], [`resolve_style_sheets`], [`Context`] |
//! | caches | [`LruCache`], [`StyleSheetCache`], [`global_cache`] |
//! | scale themes | [`create_scale_theme`], [`create_n_point_font_scale_theme`], [`create_n_point_modular_scale_theme`] |
//!
//! Color expressions are implemented in the `swatch-color` crate; its main
//! entry points are re-exported here.

pub mod cache;
mod context;
mod error;
mod merge;
pub mod prelude;
mod resolve;
mod responsive;
mod scale;
mod scale_theme;
mod styler;
pub mod theme;
mod value;

pub use cache::{global_cache, LruCache, ResolutionCache, StyleSheetCache};
pub use context::{Context, MAX_DEPTH};
pub use error::{Result, StyleError};
pub use merge::{depth_first_object_merge, merge_pair};
pub use resolve::{resolve_style_sheet, resolve_style_sheets};
pub use responsive::get_responsive_value;
pub use scale::{get_scale_value, Scale};
pub use scale_theme::{
    create_n_point_font_scale_theme, create_n_point_modular_scale_theme, create_scale_theme,
    grid_template_resolver, space_resolver, NPointFontScaleOptions, NPointModularScaleOptions,
    ScaleThemeOptions, DEFAULT_FONT_SIZES,
};
pub use styler::{
    default_styler, FormatterFn, Resolution, ResolverFn, Styled, Styler, StylerFn, StylerSpec,
};
pub use theme::theme_key::{lookup, lookup_path, lookup_theme_key, theme_key_resolver};
pub use theme::{create_theme, Theme, ThemeOptions};
pub use value::{SheetId, SheetList, StyleSheet, Value};

pub use swatch_color::{
    parse as parse_color, parse_box_shadow, BoxShadow, ColorError, ColorExpr, ColorMath,
    ColorSource, SrgbMath,
};
