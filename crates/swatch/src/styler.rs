//! Stylers: per-property handlers that turn one declaration into styles.
//!
//! A styler receives the property name, the value selected for the current
//! breakpoint and a [`Context`], and returns a [`Styled`] sheet tagged with
//! where it lands in the output:
//!
//! | Variant | Placement | Resolved again? |
//! |---------|-----------|-----------------|
//! | `Pre` / `PreFinal` | before the sheet's own styles (lowest precedence) | yes / no |
//! | `InPlace` / `InPlaceFinal` | merged into the sheet's own styles | yes / no |
//! | `Post` / `PostFinal` | after the sheet's own styles (highest precedence) | yes / no |
//!
//! Most stylers are declared with a [`StylerSpec`] naming a resolver, a
//! formatter and output properties; the theme fills in the default styling
//! function.

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Result;
use crate::value::{StyleSheet, Value};

/// Formats a resolved value for output (for example `8` to `"8px"`).
pub type FormatterFn = Arc<dyn Fn(&str, &Value) -> Value + Send + Sync>;

/// Maps a user-facing value to a concrete one, usually via theme settings.
pub type ResolverFn = Arc<dyn Fn(&str, &Value, &Context<'_>) -> Result<Value> + Send + Sync>;

/// Turns one declaration into a [`Styled`] sheet.
pub type StylerFn =
    Arc<dyn Fn(&str, Option<&Value>, &Context<'_>) -> Result<Styled> + Send + Sync>;

/// A styler's output and its placement.
#[derive(Debug, Clone, PartialEq)]
pub enum Styled {
    Pre(StyleSheet),
    PreFinal(StyleSheet),
    InPlace(StyleSheet),
    InPlaceFinal(StyleSheet),
    Post(StyleSheet),
    PostFinal(StyleSheet),
}

impl Styled {
    /// The produced sheet.
    pub fn sheet(&self) -> &StyleSheet {
        match self {
            Styled::Pre(s)
            | Styled::PreFinal(s)
            | Styled::InPlace(s)
            | Styled::InPlaceFinal(s)
            | Styled::Post(s)
            | Styled::PostFinal(s) => s,
        }
    }

    /// `true` when the sheet must not be resolved again.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Styled::PreFinal(_) | Styled::InPlaceFinal(_) | Styled::PostFinal(_)
        )
    }
}

/// Declaration of a styler, as passed to [`ThemeOptions`](crate::ThemeOptions).
///
/// ```rust
/// use swatch::StylerSpec;
///
/// let mx = StylerSpec::new()
///     .resolver("space")
///     .format("px")
///     .output_props(["marginLeft", "marginRight"]);
/// ```
#[derive(Clone, Default)]
pub struct StylerSpec {
    pub styler: Option<StylerFn>,
    pub resolver: Option<String>,
    pub format: Option<String>,
    pub output_props: Vec<String>,
}

impl StylerSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom styling function instead of the default one.
    pub fn with_styler<F>(mut self, styler: F) -> Self
    where
        F: Fn(&str, Option<&Value>, &Context<'_>) -> Result<Styled> + Send + Sync + 'static,
    {
        self.styler = Some(Arc::new(styler));
        self
    }

    pub fn resolver(mut self, name: impl Into<String>) -> Self {
        self.resolver = Some(name.into());
        self
    }

    pub fn format(mut self, name: impl Into<String>) -> Self {
        self.format = Some(name.into());
        self
    }

    /// Sets a single output property.
    pub fn output_prop(self, prop: impl Into<String>) -> Self {
        self.output_props([prop])
    }

    pub fn output_props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_props = props.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for StylerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StylerSpec")
            .field("styler", &self.styler.as_ref().map(|_| "<fn>"))
            .field("resolver", &self.resolver)
            .field("format", &self.format)
            .field("output_props", &self.output_props)
            .finish()
    }
}

/// A styler compiled against a theme: names looked up, defaults filled.
#[derive(Clone)]
pub struct Styler {
    pub(crate) style: StylerFn,
    pub(crate) resolve: ResolverFn,
    pub(crate) format: FormatterFn,
    pub(crate) output_props: Vec<String>,
    pub(crate) resolver_name: Option<String>,
    pub(crate) format_name: Option<String>,
}

impl Styler {
    pub fn output_props(&self) -> &[String] {
        &self.output_props
    }

    pub fn resolver_name(&self) -> Option<&str> {
        self.resolver_name.as_deref()
    }

    pub fn format_name(&self) -> Option<&str> {
        self.format_name.as_deref()
    }
}

impl fmt::Debug for Styler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Styler")
            .field("resolver", &self.resolver_name)
            .field("format", &self.format_name)
            .field("output_props", &self.output_props)
            .finish()
    }
}

/// The styling function used when a spec does not provide one: resolve the
/// value and write it to every output property.
pub fn default_styler(prop: &str, value: Option<&Value>, ctx: &Context<'_>) -> Result<Styled> {
    let resolution = ctx.resolve(prop, value)?;
    Ok(resolution.into_styled())
}

pub(crate) fn identity_formatter() -> FormatterFn {
    Arc::new(|_: &str, value: &Value| value.clone())
}

pub(crate) fn identity_resolver() -> ResolverFn {
    Arc::new(|_: &str, value: &Value, _: &Context<'_>| Ok(value.clone()))
}

/// Output of [`Theme::resolve`](crate::Theme::resolve).
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Properties the value is written to.
    pub properties: Vec<String>,
    /// The resolved and formatted value; `None` when the input was undefined
    /// at the breakpoint.
    pub value: Option<Value>,
}

impl Resolution {
    /// Converts to the sheet the default styler emits.
    ///
    /// A sheet-valued resolution is spread in place and resolved again, so
    /// resolvers can expand one property into several. Scalars are written
    /// to every output property and are final. An undefined value yields an
    /// empty sheet.
    pub fn into_styled(self) -> Styled {
        match self.value {
            None => Styled::InPlaceFinal(StyleSheet::new()),
            Some(Value::Sheet(sheet)) => Styled::InPlace(sheet),
            Some(value) => Styled::InPlaceFinal(
                self.properties
                    .into_iter()
                    .map(|prop| (prop, value.clone()))
                    .collect(),
            ),
        }
    }
}
