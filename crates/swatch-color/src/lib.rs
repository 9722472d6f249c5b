//! # Swatch Color - theme-aware color expressions
//!
//! `swatch-color` parses and evaluates the small color language used in
//! swatch style sheets. A color value is one of:
//!
//! - a CSS literal: `#ccc`, `rgb(0, 0, 0)`, `hsla(120, 50%, 50%, 0.5)`, `white`
//! - a theme color path: `primary`, `primary.2`, `primary.-1`, `brand.accent`
//! - a composite: `color(<color> <modifier>...)`
//!
//! ## Modifiers
//!
//! | Modifier | Effect |
//! |----------|--------|
//! | `alpha`/`a` | opacity; `50%` or `0.5` |
//! | `hue`/`h` | hue angle, wraps at 360 |
//! | `saturation`/`s`, `lightness`/`l` | HSL channels, 0–100% |
//! | `whiteness`/`w`, `blackness`/`b` | HWB channels, 0–100% |
//! | `tint(pct)`, `shade(pct)` | mix toward white / black; `20%` or `0.2` |
//! | `contrast(pct?)` | mix toward whichever of white/black contrasts most |
//! | `blend(color pct)`, `blenda(color pct)` | mix in another color (`blenda` also mixes opacity) |
//! | `if(flag then else?)` | branch on a boolean theme flag |
//!
//! An unsigned argument sets the channel; a `+`/`-` prefixed one shifts it.
//!
//! ## Evaluation
//!
//! Parsing and evaluation are separate steps. Evaluation is parameterized by
//! a [`ColorSource`] (theme lookups) and a [`ColorMath`] (color library):
//!
//! ```rust
//! use swatch_color::{parse, Palette, SrgbMath};
//!
//! let palette = Palette::new()
//!     .color("primary", "#ccc")
//!     .color("primary.1", "#bbb");
//!
//! let expr = parse("color(primary.1 alpha(50%))").unwrap();
//! assert_eq!(
//!     expr.evaluate(&palette, &SrgbMath).unwrap(),
//!     "rgba(187, 187, 187, 0.5)"
//! );
//! ```
//!
//! Box-shadow values embed colors in a comma-separated shadow list; see
//! [`parse_box_shadow`].

mod ast;
mod error;
mod eval;
mod math;
mod parser;
mod shadow;

pub use ast::{AdjustMode, Adjustment, Amount, Channel, ColorExpr, Modifier};
pub use error::{ColorError, Result};
pub use eval::{evaluate, ColorSource, Palette};
pub use math::{ColorMath, Rgba, SrgbMath};
pub use parser::{parse, MAX_DEPTH};
pub use shadow::{parse_box_shadow, BoxShadow, Shadow, ShadowColor};
