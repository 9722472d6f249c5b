//! Evaluation of parsed color expressions against a theme.
//!
//! Evaluation takes two collaborators:
//!
//! - a [`ColorSource`], which answers theme color lookups (`primary.-1`) and
//!   boolean flags (`isDark`) for `if(...)`;
//! - a [`ColorMath`] library doing the actual color arithmetic.
//!
//! Theme colors may themselves be color expressions; they are parsed and
//! evaluated recursively, up to [`MAX_DEPTH`] levels.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::trace;

use crate::ast::{ColorExpr, Modifier};
use crate::error::{ColorError, Result};
use crate::math::ColorMath;
use crate::parser::{parse, MAX_DEPTH};

/// Theme-side lookups needed by the evaluator.
pub trait ColorSource {
    /// Returns the raw theme value for a dotted color path, if the theme
    /// defines one.
    fn color(&self, path: &str) -> Option<String>;

    /// Returns the value of a boolean theme flag. Unknown flags are `false`.
    fn flag(&self, name: &str) -> bool;

    /// Parses the raw text of a theme color that is itself an expression.
    ///
    /// Sources that keep a cache of parsed expressions override this.
    fn expression(&self, raw: &str) -> Result<Arc<ColorExpr>> {
        parse(raw).map(Arc::new)
    }
}

/// A plain map-backed [`ColorSource`], keyed by full path.
///
/// # Example
///
/// ```rust
/// use swatch_color::{parse, Palette, SrgbMath};
///
/// let palette = Palette::new().color("brand", "#ff0000").flag("isDark");
/// let css = parse("color(brand if(isDark #000))")
///     .unwrap()
///     .evaluate(&palette, &SrgbMath)
///     .unwrap();
/// assert_eq!(css, "rgb(0, 0, 0)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<String, String>,
    flags: HashSet<String>,
}

impl Palette {
    /// Creates an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a color, returning the palette for chaining.
    pub fn color(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.colors.insert(path.into(), value.into());
        self
    }

    /// Sets a flag, returning the palette for chaining.
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.flags.insert(name.into());
        self
    }
}

impl ColorSource for Palette {
    fn color(&self, path: &str) -> Option<String> {
        self.colors.get(path).cloned()
    }

    fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
}

impl ColorExpr {
    /// Evaluates the expression to CSS color text.
    pub fn evaluate<S, M>(&self, source: &S, math: &M) -> Result<String>
    where
        S: ColorSource + ?Sized,
        M: ColorMath,
    {
        let color = self.evaluate_color(source, math)?;
        Ok(math.to_css(&color))
    }

    /// Evaluates the expression to a color value of the math library.
    pub fn evaluate_color<S, M>(&self, source: &S, math: &M) -> Result<M::Color>
    where
        S: ColorSource + ?Sized,
        M: ColorMath,
    {
        Evaluator { source, math }.eval(self, 0)
    }
}

/// Parses and evaluates `input` in one step.
pub fn evaluate<S, M>(input: &str, source: &S, math: &M) -> Result<String>
where
    S: ColorSource + ?Sized,
    M: ColorMath,
{
    parse(input)?.evaluate(source, math)
}

struct Evaluator<'a, S: ?Sized, M> {
    source: &'a S,
    math: &'a M,
}

impl<S, M> Evaluator<'_, S, M>
where
    S: ColorSource + ?Sized,
    M: ColorMath,
{
    fn eval(&self, expr: &ColorExpr, depth: usize) -> Result<M::Color> {
        if depth > MAX_DEPTH {
            return Err(ColorError::TooDeep(MAX_DEPTH));
        }
        match expr {
            ColorExpr::Literal(text) => self.leaf(text),
            ColorExpr::Reference(path) => match self.source.color(path) {
                Some(raw) if raw.trim() != path.as_str() => {
                    trace!("color reference {} expands to {:?}", path, raw);
                    let nested = self.source.expression(&raw)?;
                    self.eval(&nested, depth + 1)
                }
                _ => self.leaf(path),
            },
            ColorExpr::Composite { base, modifiers } => {
                let mut color = self.eval(base, depth + 1)?;
                for modifier in modifiers {
                    color = self.apply(color, modifier, depth)?;
                }
                Ok(color)
            }
        }
    }

    fn leaf(&self, text: &str) -> Result<M::Color> {
        self.math
            .parse(text)
            .ok_or_else(|| ColorError::Unparseable(text.to_string()))
    }

    fn apply(&self, color: M::Color, modifier: &Modifier, depth: usize) -> Result<M::Color> {
        let math = self.math;
        let next = match modifier {
            Modifier::Adjust(adjustment) => {
                let current = math.channel(&color, adjustment.channel);
                math.with_channel(&color, adjustment.channel, adjustment.apply(current))
            }
            Modifier::Tint(amount) => math.mix(&color, &math.white(), amount.fraction(), false),
            Modifier::Shade(amount) => math.mix(&color, &math.black(), amount.fraction(), false),
            Modifier::Contrast(amount) => {
                let white = math.white();
                let black = math.black();
                let target = if math.contrast_ratio(&color, &white)
                    >= math.contrast_ratio(&color, &black)
                {
                    white
                } else {
                    black
                };
                let weight = amount.map(|a| a.fraction()).unwrap_or(1.0);
                math.mix(&color, &target, weight, false)
            }
            Modifier::Blend {
                color: other,
                weight,
                with_alpha,
            } => {
                let other = self.eval(other, depth + 1)?;
                math.mix(&color, &other, weight.fraction(), *with_alpha)
            }
            Modifier::If {
                flag,
                then,
                otherwise,
            } => {
                if self.source.flag(flag) {
                    self.eval(then, depth + 1)?
                } else if let Some(otherwise) = otherwise {
                    self.eval(otherwise, depth + 1)?
                } else {
                    color
                }
            }
        };
        Ok(next)
    }
}
