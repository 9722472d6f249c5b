//! Theme construction and per-property dispatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, trace};
use swatch_color::{ColorExpr, ColorSource, SrgbMath};

use super::builtins::{self, CATCH_ALL, THEME_KEY};
use super::theme_key::{lookup_path, theme_key_resolver};
use crate::cache::{LruCache, ResolutionCache};
use crate::context::Context;
use crate::error::{Result, StyleError};
use crate::resolve;
use crate::responsive::get_responsive_value;
use crate::scale::Scale;
use crate::styler::{
    default_styler, identity_formatter, identity_resolver, FormatterFn, Resolution, ResolverFn,
    Styled, Styler, StylerFn, StylerSpec,
};
use crate::value::{StyleSheet, Value};

/// Default capacity of a theme's parsed-color cache.
pub const DEFAULT_COLOR_CACHE_SIZE: usize = 512;

/// Everything needed to build a [`Theme`].
///
/// Formatters, resolvers and stylers given here are layered over the
/// built-ins; an entry with a built-in's name replaces it.
///
/// ```rust
/// use swatch::{StyleSheet, StylerSpec, ThemeOptions, Value};
///
/// let theme = ThemeOptions::new()
///     .settings(StyleSheet::new().with("colors", StyleSheet::new().with("brand", "#f00")))
///     .formatter("double", |_, v| match v {
///         Value::Number(n) => Value::Number(n * 2.0),
///         other => other.clone(),
///     })
///     .styler("gutter", StylerSpec::new().format("double").output_prop("paddingLeft"))
///     .build()
///     .unwrap();
///
/// let out = theme.resolve("gutter", Some(&Value::from(4)), 0).unwrap();
/// assert_eq!(out.properties, vec!["paddingLeft"]);
/// assert_eq!(out.value, Some(Value::from(8)));
/// ```
#[derive(Clone, Default)]
pub struct ThemeOptions {
    pub formatters: HashMap<String, FormatterFn>,
    pub resolvers: HashMap<String, ResolverFn>,
    pub stylers: HashMap<String, StylerSpec>,
    /// Theme settings: colors, scales, mixins, faces and flags.
    pub settings: StyleSheet,
    /// Capacity of the parsed-color cache; `None` uses the default.
    pub color_cache_size: Option<usize>,
}

impl ThemeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn formatter<F>(mut self, name: impl Into<String>, formatter: F) -> Self
    where
        F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
    {
        self.formatters.insert(name.into(), Arc::new(formatter));
        self
    }

    pub fn resolver<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&str, &Value, &Context<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.resolvers.insert(name.into(), Arc::new(resolver));
        self
    }

    pub fn styler(mut self, name: impl Into<String>, spec: StylerSpec) -> Self {
        self.stylers.insert(name.into(), spec);
        self
    }

    pub fn settings(mut self, settings: StyleSheet) -> Self {
        self.settings = settings;
        self
    }

    pub fn color_cache_size(mut self, size: usize) -> Self {
        self.color_cache_size = Some(size);
        self
    }

    /// Builds the theme; see [`create_theme`].
    pub fn build(self) -> Result<Theme> {
        create_theme(self)
    }
}

impl fmt::Debug for ThemeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeOptions")
            .field("formatters", &sorted_keys(&self.formatters))
            .field("resolvers", &sorted_keys(&self.resolvers))
            .field("stylers", &sorted_keys(&self.stylers))
            .field("settings", &self.settings)
            .field("color_cache_size", &self.color_cache_size)
            .finish()
    }
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

/// Builds a theme, checking that every styler's resolver and formatter name
/// is defined.
///
/// # Errors
///
/// [`StyleError::ResolverNotDefined`] or [`StyleError::FormatterNotDefined`]
/// for the first (by styler name) undefined reference.
pub fn create_theme(options: ThemeOptions) -> Result<Theme> {
    let mut formatters = builtins::formatters();
    formatters.extend(options.formatters);
    let mut resolvers = builtins::resolvers();
    resolvers.extend(options.resolvers);
    let mut specs = builtins::stylers();
    specs.extend(options.stylers);

    let mut names: Vec<&String> = specs.keys().collect();
    names.sort();

    let mut stylers = HashMap::with_capacity(specs.len());
    for name in names {
        let styler = compile(name, &specs[name], &formatters, &resolvers)?;
        stylers.insert(name.clone(), styler);
    }

    let catch_all = match stylers.remove(CATCH_ALL) {
        Some(styler) => styler,
        None => compile(CATCH_ALL, &StylerSpec::new(), &formatters, &resolvers)?,
    };
    let theme_key = resolvers
        .get(THEME_KEY)
        .cloned()
        .unwrap_or_else(|| Arc::new(theme_key_resolver));

    debug!(
        "built theme: {} stylers, {} resolvers, {} formatters, {} settings",
        stylers.len(),
        resolvers.len(),
        formatters.len(),
        options.settings.len()
    );

    Ok(Theme {
        settings: options.settings,
        formatters,
        resolvers,
        stylers,
        catch_all,
        theme_key,
        resolutions: ResolutionCache::new(),
        colors: Mutex::new(LruCache::new(
            options.color_cache_size.unwrap_or(DEFAULT_COLOR_CACHE_SIZE),
        )),
    })
}

fn compile(
    name: &str,
    spec: &StylerSpec,
    formatters: &HashMap<String, FormatterFn>,
    resolvers: &HashMap<String, ResolverFn>,
) -> Result<Styler> {
    let resolve = match &spec.resolver {
        Some(r) => resolvers
            .get(r)
            .cloned()
            .ok_or_else(|| StyleError::ResolverNotDefined(r.clone()))?,
        None => identity_resolver(),
    };
    let format = match &spec.format {
        Some(f) => formatters
            .get(f)
            .cloned()
            .ok_or_else(|| StyleError::FormatterNotDefined(f.clone()))?,
        None => identity_formatter(),
    };
    let style: StylerFn = match &spec.styler {
        Some(styler) => Arc::clone(styler),
        None => Arc::new(default_styler),
    };
    let output_props = if spec.output_props.is_empty() {
        vec![name.to_string()]
    } else {
        spec.output_props.clone()
    };
    Ok(Styler {
        style,
        resolve,
        format,
        output_props,
        resolver_name: spec.resolver.clone(),
        format_name: spec.format.clone(),
    })
}

/// A compiled theme: settings plus the formatter, resolver and styler
/// tables, with caches for resolved sheets and parsed colors.
///
/// Themes are immutable once built and may be shared across threads.
pub struct Theme {
    settings: StyleSheet,
    formatters: HashMap<String, FormatterFn>,
    resolvers: HashMap<String, ResolverFn>,
    stylers: HashMap<String, Styler>,
    catch_all: Styler,
    theme_key: ResolverFn,
    resolutions: ResolutionCache,
    colors: Mutex<LruCache<String, Arc<ColorExpr>>>,
}

impl Theme {
    /// A theme with only the built-ins and the given settings.
    pub fn with_settings(settings: StyleSheet) -> Result<Self> {
        create_theme(ThemeOptions::new().settings(settings))
    }

    pub fn settings(&self) -> &StyleSheet {
        &self.settings
    }

    pub fn styler(&self, name: &str) -> Option<&Styler> {
        self.stylers.get(name)
    }

    pub fn has_formatter(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn has_resolver(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    /// The memo of resolved sheets.
    pub fn resolution_cache(&self) -> &ResolutionCache {
        &self.resolutions
    }

    /// Applies the named formatter; `None` is the identity.
    pub fn format(&self, prop: &str, formatter: Option<&str>, value: &Value) -> Result<Value> {
        match formatter {
            None => Ok(value.clone()),
            Some(name) => {
                let f = self
                    .formatters
                    .get(name)
                    .ok_or_else(|| StyleError::FormatterNotDefined(name.to_string()))?;
                Ok(f(prop, value))
            }
        }
    }

    /// Applies the named resolver; `None` is the identity.
    pub fn run_resolver(
        &self,
        prop: &str,
        resolver: Option<&str>,
        value: &Value,
        ctx: &Context<'_>,
    ) -> Result<Value> {
        match resolver {
            None => Ok(value.clone()),
            Some(name) => {
                let r = self
                    .resolvers
                    .get(name)
                    .ok_or_else(|| StyleError::ResolverNotDefined(name.to_string()))?;
                r(prop, value, ctx)
            }
        }
    }

    /// Resolves one property value at `breakpoint`.
    ///
    /// Properties with a registered styler use its resolver, formatter and
    /// output properties. Other properties go through the catch-all: the
    /// resolver registered under the property's own name if there is one,
    /// otherwise the theme-key resolver.
    pub fn resolve(&self, prop: &str, value: Option<&Value>, breakpoint: usize) -> Result<Resolution> {
        self.resolve_in(prop, value, &Context::new(self, breakpoint))
    }

    pub(crate) fn resolve_in(
        &self,
        prop: &str,
        value: Option<&Value>,
        ctx: &Context<'_>,
    ) -> Result<Resolution> {
        let (resolve, format, properties) = match self.stylers.get(prop) {
            Some(styler) => (&styler.resolve, &styler.format, styler.output_props.clone()),
            None => {
                let resolve = match self.catch_all.resolver_name {
                    Some(_) => &self.catch_all.resolve,
                    None => self.resolvers.get(prop).unwrap_or(&self.theme_key),
                };
                (resolve, &self.catch_all.format, vec![prop.to_string()])
            }
        };

        let Some(scalar) = get_responsive_value(ctx.breakpoint(), value, None) else {
            return Ok(Resolution {
                properties,
                value: None,
            });
        };
        let resolved = resolve(prop, scalar, ctx)?;
        Ok(Resolution {
            properties,
            value: Some(format(prop, &resolved)),
        })
    }

    /// Runs the styler for `prop`, falling back to the catch-all.
    pub fn style(&self, prop: &str, value: Option<&Value>, ctx: &Context<'_>) -> Result<Styled> {
        let styler = self.stylers.get(prop).unwrap_or(&self.catch_all);
        (styler.style)(prop, value, ctx)
    }

    /// Resolves a sheet at `breakpoint`; see [`resolve_style_sheet`](crate::resolve_style_sheet).
    pub fn resolve_style_sheet(&self, sheet: &StyleSheet, breakpoint: usize) -> Result<StyleSheet> {
        resolve::resolve_style_sheet(sheet, &Context::new(self, breakpoint))
    }

    /// Resolves and merges sheets at `breakpoint`; later sheets win.
    pub fn resolve_style_sheets(&self, sheets: &[StyleSheet], breakpoint: usize) -> Result<StyleSheet> {
        resolve::resolve_style_sheets(sheets, &Context::new(self, breakpoint))
    }

    /// Parses a color expression, reusing earlier parses of the same text.
    pub fn parse_color(&self, input: &str) -> Result<Arc<ColorExpr>> {
        Ok(self.parse_cached(input)?)
    }

    fn parse_cached(&self, input: &str) -> swatch_color::Result<Arc<ColorExpr>> {
        let mut cache = self.colors.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(expr) = cache.get(input) {
            trace!("color cache hit for {:?}", input);
            return Ok(Arc::clone(expr));
        }
        let expr = Arc::new(swatch_color::parse(input)?);
        cache.set(input.to_string(), Arc::clone(&expr));
        Ok(expr)
    }

    /// Evaluates a color expression against this theme's colors and flags.
    pub fn evaluate_color(&self, input: &str) -> Result<String> {
        let expr = self.parse_color(input)?;
        Ok(expr.evaluate(self, &SrgbMath)?)
    }

    /// The color scale `colors.<name>`.
    ///
    /// # Errors
    ///
    /// [`StyleError::MissingScale`] when the theme has no such scale.
    pub fn color_scale(&self, name: &str) -> Result<&Scale> {
        self.settings
            .get("colors")
            .and_then(Value::as_sheet)
            .and_then(|colors| colors.get(name))
            .and_then(Value::as_scale)
            .ok_or_else(|| StyleError::MissingScale(name.to_string()))
    }
}

impl ColorSource for Theme {
    fn color(&self, path: &str) -> Option<String> {
        match lookup_path(self.settings.get("colors")?, path)? {
            Value::String(raw) => Some(raw),
            _ => None,
        }
    }

    fn flag(&self, name: &str) -> bool {
        matches!(self.settings.get(name), Some(Value::Bool(true)))
    }

    fn expression(&self, raw: &str) -> swatch_color::Result<Arc<ColorExpr>> {
        self.parse_cached(raw)
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme")
            .field("settings", &self.settings)
            .field("formatters", &sorted_keys(&self.formatters))
            .field("resolvers", &sorted_keys(&self.resolvers))
            .field("stylers", &sorted_keys(&self.stylers))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> StyleSheet {
        StyleSheet::from_yaml(
            r##"
isDark: true
colors:
  primary:
    values: ["#ddd", "#ccc", "#bbb"]
    offset: 1
  accent: "color(primary.1 alpha(50%))"
fontFamily:
  body: Inter
"##,
        )
        .unwrap()
    }

    fn theme() -> Theme {
        Theme::with_settings(settings()).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn unknown_resolver_is_rejected() {
            let err = ThemeOptions::new()
                .styler("m", StylerSpec::new().resolver("space"))
                .build()
                .unwrap_err();
            assert_eq!(err.to_string(), "Resolver \"space\" is not defined");
        }

        #[test]
        fn unknown_formatter_is_rejected() {
            let err = ThemeOptions::new()
                .styler("m", StylerSpec::new().format("vw"))
                .build()
                .unwrap_err();
            assert_eq!(err.to_string(), "Formatter \"vw\" is not defined");
        }

        #[test]
        fn user_entries_replace_builtins() {
            let theme = ThemeOptions::new()
                .formatter("px", |_, _| Value::from("replaced"))
                .styler("margin", StylerSpec::new().format("px"))
                .build()
                .unwrap();
            let out = theme.resolve("margin", Some(&Value::from(1)), 0).unwrap();
            assert_eq!(out.value, Some(Value::from("replaced")));
        }

        #[test]
        fn output_props_default_to_styler_name() {
            let theme = ThemeOptions::new()
                .styler("gap", StylerSpec::new())
                .build()
                .unwrap();
            assert_eq!(theme.styler("gap").unwrap().output_props(), ["gap"]);
        }
    }

    mod dispatch {
        use super::*;

        #[test]
        fn format_by_name() {
            let t = theme();
            assert_eq!(t.format("m", Some("px"), &Value::from(2)).unwrap(), Value::from("2px"));
            assert_eq!(t.format("m", None, &Value::from(2)).unwrap(), Value::from(2));
            assert!(matches!(
                t.format("m", Some("nope"), &Value::from(2)),
                Err(StyleError::FormatterNotDefined(name)) if name == "nope"
            ));
        }

        #[test]
        fn run_resolver_by_name() {
            let t = theme();
            let ctx = Context::new(&t, 0);
            assert_eq!(
                t.run_resolver("fontFamily", Some("themeKey"), &Value::from("body"), &ctx)
                    .unwrap(),
                Value::from("Inter")
            );
            assert!(matches!(
                t.run_resolver("x", Some("nope"), &Value::Null, &ctx),
                Err(StyleError::ResolverNotDefined(_))
            ));
        }

        #[test]
        fn catch_all_uses_theme_key() {
            let out = theme().resolve("fontFamily", Some(&Value::from("body")), 0).unwrap();
            assert_eq!(out.properties, vec!["fontFamily"]);
            assert_eq!(out.value, Some(Value::from("Inter")));
        }

        #[test]
        fn catch_all_prefers_resolver_named_after_prop() {
            let theme = ThemeOptions::new()
                .resolver("opacity", |_, _, _| Ok(Value::from(0.25)))
                .build()
                .unwrap();
            let out = theme.resolve("opacity", Some(&Value::from("faint")), 0).unwrap();
            assert_eq!(out.value, Some(Value::from(0.25)));
        }

        #[test]
        fn undefined_at_breakpoint() {
            let value = Value::responsive([None, Some(Value::from("body"))]);
            let out = theme().resolve("fontFamily", Some(&value), 0).unwrap();
            assert_eq!(out.value, None);
            let out = theme().resolve("fontFamily", Some(&value), 1).unwrap();
            assert_eq!(out.value, Some(Value::from("Inter")));
        }
    }

    mod colors {
        use super::*;

        #[test]
        fn color_props_evaluate_expressions() {
            let out = theme().resolve("color", Some(&Value::from("primary.1")), 0).unwrap();
            assert_eq!(out.value, Some(Value::from("rgb(187, 187, 187)")));
        }

        #[test]
        fn theme_colors_may_be_expressions() {
            assert_eq!(
                theme().evaluate_color("accent").unwrap(),
                "rgba(187, 187, 187, 0.5)"
            );
        }

        #[test]
        fn keywords_pass_through() {
            let out = theme().resolve("color", Some(&Value::from("inherit")), 0).unwrap();
            assert_eq!(out.value, Some(Value::from("inherit")));
        }

        #[test]
        fn flags_come_from_settings() {
            let t = theme();
            assert!(ColorSource::flag(&t, "isDark"));
            assert!(!ColorSource::flag(&t, "isHighContrast"));
            assert_eq!(
                t.evaluate_color("color(primary if(isDark #000 #fff))").unwrap(),
                "rgb(0, 0, 0)"
            );
        }

        #[test]
        fn parsed_colors_are_cached() {
            let t = theme();
            let first = t.parse_color("color(primary alpha(10%))").unwrap();
            let second = t.parse_color("color(primary alpha(10%))").unwrap();
            assert!(Arc::ptr_eq(&first, &second));
        }

        #[test]
        fn referenced_expressions_use_the_cache() {
            let t = theme();
            assert_eq!(t.evaluate_color("accent").unwrap(), "rgba(187, 187, 187, 0.5)");
            let cached = {
                let cache = t.colors.lock().unwrap();
                Arc::clone(cache.peek("color(primary.1 alpha(50%))").unwrap())
            };
            assert!(Arc::ptr_eq(
                &cached,
                &t.expression("color(primary.1 alpha(50%))").unwrap()
            ));
            assert_eq!(t.evaluate_color("accent").unwrap(), "rgba(187, 187, 187, 0.5)");
        }

        #[test]
        fn unparseable_color_errors() {
            let err = theme().resolve("color", Some(&Value::from("asis")), 0).unwrap_err();
            assert_eq!(err.to_string(), "Unable to parse color from string: asis");
        }

        #[test]
        fn unknown_hex_looking_names_error() {
            for name in ["bad", "face", "beef"] {
                let err = theme().resolve("color", Some(&Value::from(name)), 0).unwrap_err();
                assert_eq!(
                    err.to_string(),
                    format!("Unable to parse color from string: {}", name)
                );
            }
        }

        #[test]
        fn color_scale_lookup() {
            let t = theme();
            assert_eq!(t.color_scale("primary").unwrap().offset, 1);
            assert!(matches!(
                t.color_scale("secondary"),
                Err(StyleError::MissingScale(name)) if name == "secondary"
            ));
        }

        #[test]
        fn box_shadow_colors() {
            let out = theme()
                .resolve("boxShadow", Some(&Value::from("0 1px 2px primary.-1")), 0)
                .unwrap();
            assert_eq!(out.value, Some(Value::from("0 1px 2px rgb(221, 221, 221)")));
        }
    }
}
