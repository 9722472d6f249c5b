//! Box-shadow values with embedded color expressions.
//!
//! A box-shadow is a comma-separated list of shadows. Each shadow has
//! optional `inset`, two to four lengths, and an optional color. The color
//! may be anything the color grammar accepts, including theme references
//! (`primary.-1`) and `color(...)` composites:
//!
//! ```text
//! 0 1px 2px color(primary alpha(30%)), inset 0 0 0 1px gray.2
//! ```
//!
//! Tokenizing is done with `cssparser`; each color component's source text
//! is handed to the color parser.

use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::ast::ColorExpr;
use crate::error::{ColorError, Result};
use crate::eval::ColorSource;
use crate::math::ColorMath;
use crate::parser::parse;

/// A single shadow entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    /// `true` when the `inset` keyword is present.
    pub inset: bool,
    /// Offset, blur and spread lengths, as written.
    pub lengths: Vec<String>,
    /// The shadow color, if one was given.
    pub color: Option<ColorExpr>,
}

/// A parsed box-shadow list.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShadow {
    /// Shadows in source order.
    pub shadows: Vec<Shadow>,
}

/// A color extracted from one shadow entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowColor<'a> {
    /// Index of the shadow in the list.
    pub index: usize,
    /// The color expression.
    pub color: &'a ColorExpr,
}

impl BoxShadow {
    /// Returns one record per shadow that carries a color.
    pub fn colors(&self) -> Vec<ShadowColor<'_>> {
        self.shadows
            .iter()
            .enumerate()
            .filter_map(|(index, shadow)| {
                shadow
                    .color
                    .as_ref()
                    .map(|color| ShadowColor { index, color })
            })
            .collect()
    }

    /// Evaluates every color and serialises the shadow list back to CSS.
    pub fn evaluate<S, M>(&self, source: &S, math: &M) -> Result<String>
    where
        S: ColorSource + ?Sized,
        M: ColorMath,
    {
        let mut parts = Vec::with_capacity(self.shadows.len());
        for shadow in &self.shadows {
            let mut words: Vec<String> = Vec::new();
            if shadow.inset {
                words.push("inset".to_string());
            }
            words.extend(shadow.lengths.iter().cloned());
            match &shadow.color {
                Some(ColorExpr::Reference(name)) if is_color_keyword(name) => {
                    words.push(name.clone());
                }
                Some(color) => words.push(color.evaluate(source, math)?),
                None => {}
            }
            parts.push(words.join(" "));
        }
        Ok(parts.join(", "))
    }
}

/// Color keywords written through as-is instead of being evaluated.
const COLOR_KEYWORDS: &[&str] = &["currentColor", "inherit", "initial", "unset", "revert", "transparent"];

fn is_color_keyword(name: &str) -> bool {
    COLOR_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(name))
}

/// Raw pieces of one shadow, collected while the tokenizer borrows the input.
struct RawShadow {
    inset: bool,
    lengths: Vec<String>,
    color: Option<String>,
}

/// Parses a box-shadow value.
///
/// # Example
///
/// ```rust
/// use swatch_color::parse_box_shadow;
///
/// let shadow = parse_box_shadow("0 1px 2px primary.1, inset 0 0 4px #000").unwrap();
/// assert_eq!(shadow.shadows.len(), 2);
/// assert_eq!(shadow.colors().len(), 2);
/// assert!(shadow.shadows[1].inset);
/// ```
pub fn parse_box_shadow(input: &str) -> Result<BoxShadow> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);

    let raw = parser
        .parse_comma_separated(parse_shadow)
        .map_err(|e| ColorError::BoxShadow {
            input: input.to_string(),
            message: format!("{:?} at column {}", e.kind, e.location.column),
        })?;

    let shadows = raw
        .into_iter()
        .map(|shadow| {
            let color = shadow.color.as_deref().map(parse).transpose()?;
            Ok(Shadow {
                inset: shadow.inset,
                lengths: shadow.lengths,
                color,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BoxShadow { shadows })
}

fn parse_shadow<'i>(parser: &mut Parser<'i, '_>) -> std::result::Result<RawShadow, ParseError<'i, ()>> {
    let mut shadow = RawShadow {
        inset: false,
        lengths: Vec::new(),
        color: None,
    };

    loop {
        let start = parser.position();
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Ident(ref name) if name.eq_ignore_ascii_case("inset") => shadow.inset = true,
            Token::Number { .. } | Token::Dimension { .. } => {
                shadow
                    .lengths
                    .push(parser.slice_from(start).trim().to_string());
            }
            Token::Function(ref name) if is_length_function(name) => {
                skip_block(parser)?;
                shadow
                    .lengths
                    .push(parser.slice_from(start).trim().to_string());
            }
            Token::Function(_) => {
                skip_block(parser)?;
                shadow.color = Some(parser.slice_from(start).trim().to_string());
            }
            Token::Hash(_) | Token::IDHash(_) => {
                shadow.color = Some(parser.slice_from(start).trim().to_string());
            }
            Token::Ident(_) => {
                skip_path_segments(parser);
                shadow.color = Some(parser.slice_from(start).trim().to_string());
            }
            other => return Err(parser.new_unexpected_token_error(other)),
        }
    }

    if shadow.lengths.is_empty() && shadow.color.is_none() {
        return Err(parser.new_custom_error(()));
    }
    Ok(shadow)
}

fn is_length_function(name: &str) -> bool {
    ["calc", "var", "min", "max", "clamp"]
        .iter()
        .any(|f| name.eq_ignore_ascii_case(f))
}

fn skip_block<'i>(parser: &mut Parser<'i, '_>) -> std::result::Result<(), ParseError<'i, ()>> {
    parser.parse_nested_block(|block| {
        while block.next().is_ok() {}
        Ok(())
    })
}

/// Consumes the `.1`, `.-1` and `.name` tails of a theme path.
///
/// `primary.1` tokenizes as an ident followed by the number `.1`, while
/// `primary.-1` and `brand.accent` produce a `.` delimiter first.
fn skip_path_segments(parser: &mut Parser<'_, '_>) {
    loop {
        let state = parser.state();
        let segment_start = parser.position();
        let (is_number, is_dot) = match parser.next_including_whitespace() {
            Ok(Token::Number { .. }) => (true, false),
            Ok(Token::Delim('.')) => (false, true),
            _ => (false, false),
        };
        let is_segment = if is_number {
            parser.slice_from(segment_start).starts_with('.')
        } else if is_dot {
            matches!(
                parser.next_including_whitespace(),
                Ok(Token::Number { .. }) | Ok(Token::Ident(_))
            )
        } else {
            false
        };
        if !is_segment {
            parser.reset(&state);
            return;
        }
    }
}
