//! The context handed to stylers and resolvers.

use crate::error::{Result, StyleError};
use crate::resolve;
use crate::styler::{Resolution, Styled};
use crate::theme::Theme;
use crate::value::{StyleSheet, Value};

/// Maximum nesting of style sheet resolution (blocks, mixins, faces).
pub const MAX_DEPTH: usize = 64;

/// The theme and breakpoint a sheet is being resolved for.
///
/// Stylers and resolvers use it to reach theme settings and to call back into
/// resolution.
#[derive(Debug, Clone, Copy)]
pub struct Context<'t> {
    theme: &'t Theme,
    breakpoint: usize,
    depth: usize,
}

impl<'t> Context<'t> {
    pub fn new(theme: &'t Theme, breakpoint: usize) -> Self {
        Context {
            theme,
            breakpoint,
            depth: 0,
        }
    }

    pub fn theme(&self) -> &'t Theme {
        self.theme
    }

    pub fn breakpoint(&self) -> usize {
        self.breakpoint
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The theme's settings sheet.
    pub fn settings(&self) -> &'t StyleSheet {
        self.theme.settings()
    }

    /// Looks up a top-level theme setting.
    pub fn setting(&self, key: &str) -> Option<&'t Value> {
        self.theme.settings().get(key)
    }

    /// Resolves one property value at this context's breakpoint.
    pub fn resolve(&self, prop: &str, value: Option<&Value>) -> Result<Resolution> {
        self.theme.resolve_in(prop, value, self)
    }

    /// Runs the styler registered for `prop`.
    pub fn style(&self, prop: &str, value: Option<&Value>) -> Result<Styled> {
        self.theme.style(prop, value, self)
    }

    /// Applies a named formatter.
    pub fn format(&self, prop: &str, formatter: Option<&str>, value: &Value) -> Result<Value> {
        self.theme.format(prop, formatter, value)
    }

    /// Applies a named resolver.
    pub fn run_resolver(&self, prop: &str, resolver: Option<&str>, value: &Value) -> Result<Value> {
        self.theme.run_resolver(prop, resolver, value, self)
    }

    /// Resolves a nested sheet in this context.
    pub fn resolve_sheet(&self, sheet: &StyleSheet) -> Result<StyleSheet> {
        resolve::resolve_style_sheet(sheet, self)
    }

    /// A context one nesting level deeper.
    pub(crate) fn nested(&self) -> Result<Context<'t>> {
        if self.depth >= MAX_DEPTH {
            return Err(StyleError::TooDeep(MAX_DEPTH));
        }
        Ok(Context {
            depth: self.depth + 1,
            ..*self
        })
    }
}
