//! Recursive-descent parser for color expressions.
//!
//! Grammar:
//!
//! ```text
//! Expr      := Hex | Literal | Composite | Reference
//! Hex       := "#" HEXDIGIT+
//! Literal   := ("rgb" | "rgba" | "hsl" | "hsla" | "hwb") "(" balanced ")"
//! Composite := "color(" Expr Modifier* ")"
//! Modifier  := Name "(" Args? ")"
//! Reference := Ident ("." ("-"? Digit+ | Ident))*
//! Amount    := ("+" | "-")? Number ("%" | "deg")?
//! ```
//!
//! Whitespace and commas both separate arguments. A sign on an adjuster
//! argument makes it relative (`lightness(+10%)`), no sign sets the channel
//! outright (`lightness(10%)`).

use crate::ast::{AdjustMode, Adjustment, Amount, Channel, ColorExpr, Modifier};
use crate::error::{ColorError, Result};

/// Maximum nesting of `color(...)` inside itself, and of theme colors that
/// refer to other theme colors.
pub const MAX_DEPTH: usize = 16;

const LITERAL_FUNCTIONS: &[&str] = &["rgb", "rgba", "hsl", "hsla", "hwb"];

/// Parses a color expression.
///
/// # Example
///
/// ```rust
/// use swatch_color::{parse, ColorExpr};
///
/// let expr = parse("color(primary.1 alpha(50%))").unwrap();
/// assert!(matches!(expr, ColorExpr::Composite { .. }));
/// ```
pub fn parse(input: &str) -> Result<ColorExpr> {
    let mut parser = Parser::new(input);
    let expr = parser.expr(0)?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.unexpected());
    }
    Ok(expr)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace() || c == ',') {
            self.bump();
        }
    }

    fn unexpected(&self) -> ColorError {
        let found = match self.peek() {
            Some(c) => format!("`{}`", c),
            None => "end of input".to_string(),
        };
        ColorError::Syntax {
            input: self.input.to_string(),
            offset: self.pos,
            found,
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn is_ident_start(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_' || c == '-'
    }

    fn is_ident_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }

    fn ident(&mut self) -> Result<&'a str> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(c) if Self::is_ident_start(c) => self.bump(),
            _ => return Err(self.unexpected()),
        }
        while matches!(self.peek(), Some(c) if Self::is_ident_char(c)) {
            self.bump();
        }
        Ok(&self.input[start..self.pos])
    }

    fn expr(&mut self, depth: usize) -> Result<ColorExpr> {
        if depth > MAX_DEPTH {
            return Err(ColorError::TooDeep(MAX_DEPTH));
        }
        self.skip_ws();
        match self.peek() {
            Some('#') => Ok(self.hex()),
            Some(c) if Self::is_ident_start(c) => {
                let start = self.pos;
                let name = self.ident()?;
                if self.peek() == Some('(') {
                    let lowered = name.to_ascii_lowercase();
                    if lowered == "color" {
                        self.bump();
                        self.composite(depth)
                    } else if LITERAL_FUNCTIONS.contains(&lowered.as_str()) {
                        self.balanced()?;
                        Ok(ColorExpr::Literal(self.input[start..self.pos].to_string()))
                    } else {
                        self.pos = start;
                        Err(self.unexpected())
                    }
                } else {
                    self.reference_tail();
                    Ok(ColorExpr::Reference(self.input[start..self.pos].to_string()))
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    fn hex(&mut self) -> ColorExpr {
        let start = self.pos;
        self.bump();
        while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
            self.bump();
        }
        ColorExpr::Literal(self.input[start..self.pos].to_string())
    }

    /// Consumes `.segment` parts of a dotted theme path.
    fn reference_tail(&mut self) {
        while self.peek() == Some('.') {
            let segment_ok = match self.peek_second() {
                Some('-') => self
                    .rest()
                    .chars()
                    .nth(2)
                    .is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit() || Self::is_ident_start(c),
                None => false,
            };
            if !segment_ok {
                break;
            }
            self.bump();
            self.bump();
            while matches!(self.peek(), Some(c) if Self::is_ident_char(c)) {
                self.bump();
            }
        }
    }

    /// Consumes a parenthesized group, including nested groups.
    fn balanced(&mut self) -> Result<()> {
        let mut level = 0usize;
        loop {
            match self.peek() {
                Some('(') => level += 1,
                Some(')') => {
                    level -= 1;
                    if level == 0 {
                        self.bump();
                        return Ok(());
                    }
                }
                Some(_) => {}
                None => return Err(self.unexpected()),
            }
            self.bump();
        }
    }

    fn composite(&mut self, depth: usize) -> Result<ColorExpr> {
        let base = self.expr(depth + 1)?;
        let mut modifiers = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                Some(')') => {
                    self.bump();
                    break;
                }
                Some(_) => modifiers.push(self.modifier(depth)?),
                None => return Err(self.unexpected()),
            }
        }
        Ok(ColorExpr::Composite {
            base: Box::new(base),
            modifiers,
        })
    }

    fn modifier(&mut self, depth: usize) -> Result<Modifier> {
        let name = self.ident()?;
        self.expect('(')?;
        let modifier = match name {
            "alpha" | "a" => self.adjustment(Channel::Alpha)?,
            "hue" | "h" => self.adjustment(Channel::Hue)?,
            "saturation" | "s" => self.adjustment(Channel::Saturation)?,
            "lightness" | "l" => self.adjustment(Channel::Lightness)?,
            "whiteness" | "w" => self.adjustment(Channel::Whiteness)?,
            "blackness" | "b" => self.adjustment(Channel::Blackness)?,
            "tint" => Modifier::Tint(self.weight(name)?),
            "shade" => Modifier::Shade(self.weight(name)?),
            "contrast" => {
                self.skip_ws();
                if self.peek() == Some(')') {
                    Modifier::Contrast(None)
                } else {
                    Modifier::Contrast(Some(self.weight(name)?))
                }
            }
            "blend" | "blenda" => {
                self.skip_ws();
                if self.peek() == Some(')') {
                    return Err(invalid(name, "expects a color and an amount"));
                }
                let color = self.expr(depth + 1)?;
                self.skip_separators();
                let weight = self.weight(name)?;
                Modifier::Blend {
                    color: Box::new(color),
                    weight,
                    with_alpha: name == "blenda",
                }
            }
            "if" => {
                let flag = self.ident()?.to_string();
                self.skip_separators();
                if self.peek() == Some(')') {
                    return Err(invalid(name, "expects a flag and one or two colors"));
                }
                let then = self.expr(depth + 1)?;
                self.skip_separators();
                let otherwise = if self.peek() == Some(')') {
                    None
                } else {
                    Some(Box::new(self.expr(depth + 1)?))
                };
                Modifier::If {
                    flag,
                    then: Box::new(then),
                    otherwise,
                }
            }
            other => return Err(ColorError::UnknownModifier(other.to_string())),
        };
        self.skip_separators();
        if matches!(self.peek(), Some(c) if c != ')') {
            return Err(invalid(name, "too many arguments"));
        }
        self.expect(')')?;
        Ok(modifier)
    }

    fn adjustment(&mut self, channel: Channel) -> Result<Modifier> {
        let (amount, signed) = self.amount()?;
        Ok(Modifier::Adjust(Adjustment {
            channel,
            mode: if signed {
                AdjustMode::Shift
            } else {
                AdjustMode::Set
            },
            amount,
        }))
    }

    /// Reads the unsigned mixing amount of `tint`, `shade`, `contrast` or
    /// `blend`.
    fn weight(&mut self, modifier: &str) -> Result<Amount> {
        self.skip_ws();
        if self.peek() == Some(')') {
            return Err(invalid(modifier, "expects an amount"));
        }
        let (amount, signed) = self.amount()?;
        if signed {
            return Err(invalid(
                modifier,
                &format!("expects an unsigned amount, got {}", amount),
            ));
        }
        Ok(amount)
    }

    /// Reads a number with optional sign and `%`/`deg` suffix.
    ///
    /// Returns the amount and whether an explicit sign was written.
    fn amount(&mut self) -> Result<(Amount, bool)> {
        self.skip_ws();
        let start = self.pos;
        let signed = matches!(self.peek(), Some('+') | Some('-'));
        if signed {
            self.bump();
        }
        let digits_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.bump();
        }
        if self.pos == digits_start {
            self.pos = start;
            return Err(self.unexpected());
        }
        let value: f64 = self.input[start..self.pos]
            .trim_start_matches('+')
            .parse()
            .map_err(|_| ColorError::Syntax {
                input: self.input.to_string(),
                offset: start,
                found: format!("`{}`", &self.input[start..self.pos]),
            })?;
        let percent = if self.peek() == Some('%') {
            self.bump();
            true
        } else {
            if self.rest().starts_with("deg") {
                self.pos += 3;
            }
            false
        };
        Ok((Amount { value, percent }, signed))
    }
}

fn invalid(modifier: &str, message: &str) -> ColorError {
    ColorError::InvalidArguments {
        modifier: modifier.to_string(),
        message: message.to_string(),
    }
}
