//! Syntax tree for color expressions.
//!
//! A parsed expression is one of three shapes:
//!
//! - [`ColorExpr::Literal`]: hex (`#ccc`) or a functional CSS color
//!   (`rgb(...)`, `rgba(...)`, `hsl(...)`, `hsla(...)`, `hwb(...)`), kept as
//!   source text and handed to the [`ColorMath`](crate::ColorMath) parser.
//! - [`ColorExpr::Reference`]: a dotted theme color path such as `primary`,
//!   `primary.2`, `primary.-1` or `brand.accent.1`. A bare name that the theme
//!   does not know is tried as a CSS named color during evaluation.
//! - [`ColorExpr::Composite`]: `color(<base> <modifier>...)`.

use std::fmt;

/// A parsed color expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorExpr {
    /// Literal CSS color text.
    Literal(String),
    /// Theme color path.
    Reference(String),
    /// `color(base modifier...)`.
    Composite {
        /// The color the modifiers start from.
        base: Box<ColorExpr>,
        /// Modifiers applied left to right.
        modifiers: Vec<Modifier>,
    },
}

/// Channels addressable by the adjuster modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Opacity, `0.0..=1.0`.
    Alpha,
    /// Hue angle in degrees, wrapping at 360.
    Hue,
    /// HSL saturation, `0..=100`.
    Saturation,
    /// HSL lightness, `0..=100`.
    Lightness,
    /// HWB whiteness, `0..=100`.
    Whiteness,
    /// HWB blackness, `0..=100`.
    Blackness,
}

impl Channel {
    /// Clamps (or for hue, wraps) a channel value into its valid range.
    pub fn normalize(self, value: f64) -> f64 {
        match self {
            Channel::Alpha => value.clamp(0.0, 1.0),
            Channel::Hue => value.rem_euclid(360.0),
            _ => value.clamp(0.0, 100.0),
        }
    }

    /// Converts a written amount into channel units.
    ///
    /// Alpha is the only channel whose percentages and plain numbers differ:
    /// `alpha(50%)` and `alpha(0.5)` mean the same thing. Plain numbers are
    /// fractions here as in [`Amount::fraction`], so `alpha(50)` is opaque.
    pub fn units(self, amount: Amount) -> f64 {
        match (self, amount.percent) {
            (Channel::Alpha, true) => amount.value / 100.0,
            _ => amount.value,
        }
    }
}

/// A number as written in a modifier argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount {
    /// Numeric value, sign included.
    pub value: f64,
    /// `true` when written with a `%` suffix.
    pub percent: bool,
}

impl Amount {
    /// The amount as a `0.0..=1.0` fraction. Plain numbers are already
    /// fractions, as for alpha: `tint(0.2)` reads like `tint(20%)`, and
    /// `tint(2)` clamps to `tint(100%)`.
    pub fn fraction(self) -> f64 {
        let fraction = if self.percent {
            self.value / 100.0
        } else {
            self.value
        };
        fraction.clamp(0.0, 1.0)
    }
}

/// Whether an adjuster sets a channel or shifts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustMode {
    /// Unsigned argument: replace the channel value.
    Set,
    /// `+`/`-` prefixed argument: add to the current value.
    Shift,
}

/// An argument to a channel adjuster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    /// Target channel.
    pub channel: Channel,
    /// Set or shift.
    pub mode: AdjustMode,
    /// Amount as written.
    pub amount: Amount,
}

impl Adjustment {
    /// Applies this adjustment to a current channel value.
    pub fn apply(&self, current: f64) -> f64 {
        let delta = self.channel.units(self.amount);
        let next = match self.mode {
            AdjustMode::Set => delta,
            AdjustMode::Shift => current + delta,
        };
        self.channel.normalize(next)
    }
}

/// A modifier inside `color(...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    /// `alpha`/`a`, `hue`/`h`, `saturation`/`s`, `lightness`/`l`,
    /// `whiteness`/`w`, `blackness`/`b`.
    Adjust(Adjustment),
    /// `tint(pct)`: mix toward white.
    Tint(Amount),
    /// `shade(pct)`: mix toward black.
    Shade(Amount),
    /// `contrast(pct?)`: move toward whichever of white or black reads best.
    Contrast(Option<Amount>),
    /// `blend(color pct)` and `blenda(color pct)`.
    Blend {
        /// Color mixed in.
        color: Box<ColorExpr>,
        /// Weight of `color` in the result.
        weight: Amount,
        /// `true` for `blenda`, which also blends opacity.
        with_alpha: bool,
    },
    /// `if(flag then otherwise?)`.
    If {
        /// Theme flag name.
        flag: String,
        /// Color used when the flag is set.
        then: Box<ColorExpr>,
        /// Color used otherwise; the current color when omitted.
        otherwise: Option<Box<ColorExpr>>,
    },
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, if self.percent { "%" } else { "" })
    }
}

impl fmt::Display for ColorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorExpr::Literal(text) | ColorExpr::Reference(text) => f.write_str(text),
            ColorExpr::Composite { base, modifiers } => {
                write!(f, "color({}", base)?;
                for modifier in modifiers {
                    write!(f, " {}", modifier)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Adjust(adj) => {
                let name = match adj.channel {
                    Channel::Alpha => "alpha",
                    Channel::Hue => "hue",
                    Channel::Saturation => "saturation",
                    Channel::Lightness => "lightness",
                    Channel::Whiteness => "whiteness",
                    Channel::Blackness => "blackness",
                };
                let sign = match adj.mode {
                    AdjustMode::Shift if adj.amount.value >= 0.0 => "+",
                    _ => "",
                };
                write!(f, "{}({}{})", name, sign, adj.amount)
            }
            Modifier::Tint(amount) => write!(f, "tint({})", amount),
            Modifier::Shade(amount) => write!(f, "shade({})", amount),
            Modifier::Contrast(Some(amount)) => write!(f, "contrast({})", amount),
            Modifier::Contrast(None) => f.write_str("contrast()"),
            Modifier::Blend {
                color,
                weight,
                with_alpha,
            } => {
                let name = if *with_alpha { "blenda" } else { "blend" };
                write!(f, "{}({} {})", name, color, weight)
            }
            Modifier::If {
                flag,
                then,
                otherwise,
            } => match otherwise {
                Some(otherwise) => write!(f, "if({} {} {})", flag, then, otherwise),
                None => write!(f, "if({} {})", flag, then),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_wraps_instead_of_clamping() {
        assert_eq!(Channel::Hue.normalize(370.0), 10.0);
        assert_eq!(Channel::Hue.normalize(-30.0), 330.0);
    }

    #[test]
    fn percentage_channels_clamp() {
        assert_eq!(Channel::Lightness.normalize(130.0), 100.0);
        assert_eq!(Channel::Saturation.normalize(-5.0), 0.0);
        assert_eq!(Channel::Alpha.normalize(1.5), 1.0);
    }

    #[test]
    fn alpha_percent_and_number_agree() {
        let pct = Amount {
            value: 50.0,
            percent: true,
        };
        let num = Amount {
            value: 0.5,
            percent: false,
        };
        assert_eq!(Channel::Alpha.units(pct), Channel::Alpha.units(num));
    }

    #[test]
    fn plain_amounts_are_fractions() {
        let plain = |value| Amount {
            value,
            percent: false,
        };
        let pct = |value| Amount {
            value,
            percent: true,
        };
        assert_eq!(plain(0.5).fraction(), pct(50.0).fraction());
        assert_eq!(plain(1.0).fraction(), 1.0);
        assert_eq!(plain(2.0).fraction(), 1.0);
        assert_eq!(pct(1.0).fraction(), 0.01);
        assert_eq!(pct(2.0).fraction(), 0.02);
        assert_eq!(plain(-1.0).fraction(), 0.0);
        assert_eq!(Channel::Alpha.units(plain(50.0)), 50.0);
        assert_eq!(Channel::Alpha.normalize(Channel::Alpha.units(plain(50.0))), 1.0);
    }

    #[test]
    fn shift_adds_to_current() {
        let adj = Adjustment {
            channel: Channel::Lightness,
            mode: AdjustMode::Shift,
            amount: Amount {
                value: -25.0,
                percent: true,
            },
        };
        assert_eq!(adj.apply(60.0), 35.0);
        assert_eq!(adj.apply(10.0), 0.0);
    }

    #[test]
    fn display_round_trips_shape() {
        let expr = ColorExpr::Composite {
            base: Box::new(ColorExpr::Reference("primary".into())),
            modifiers: vec![Modifier::Tint(Amount {
                value: 20.0,
                percent: true,
            })],
        };
        assert_eq!(expr.to_string(), "color(primary tint(20%))");
    }
}
