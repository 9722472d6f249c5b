//! Formatters, resolvers and stylers every theme starts with.
//!
//! User-supplied entries with the same name replace these.

use std::collections::HashMap;
use std::sync::Arc;

use log::warn;
use swatch_color::{parse_box_shadow, SrgbMath};

use super::theme_key::{lookup_theme_key, theme_key_resolver};
use crate::context::Context;
use crate::error::Result;
use crate::merge::depth_first_object_merge;
use crate::styler::{FormatterFn, ResolverFn, Styled, StylerSpec};
use crate::value::{StyleSheet, Value};

/// Name of the fallback styler used for properties without their own.
pub const CATCH_ALL: &str = "catchAll";

/// Name of the default resolver for catch-all properties.
pub const THEME_KEY: &str = "themeKey";

/// Properties whose values are color expressions.
pub const COLOR_PROPS: &[&str] = &[
    "color",
    "backgroundColor",
    "borderColor",
    "borderTopColor",
    "borderRightColor",
    "borderBottomColor",
    "borderLeftColor",
    "outlineColor",
    "fill",
    "stroke",
    "caretColor",
    "textDecorationColor",
];

/// Properties whose values are shadow lists.
pub const SHADOW_PROPS: &[&str] = &["boxShadow", "textShadow"];

const CSS_WIDE_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "currentColor", "none"];

fn is_css_keyword(value: &str) -> bool {
    CSS_WIDE_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(value.trim()))
}

fn unit(suffix: &'static str) -> FormatterFn {
    Arc::new(move |_: &str, value: &Value| match value {
        Value::Number(n) => Value::String(format!("{}{}", n, suffix)),
        other => other.clone(),
    })
}

fn percent(_: &str, value: &Value) -> Value {
    match value {
        Value::Number(n) => {
            let pct = if n.abs() <= 1.0 { n * 100.0 } else { *n };
            Value::String(format!("{}%", (pct * 1e6).round() / 1e6))
        }
        other => other.clone(),
    }
}

pub(crate) fn formatters() -> HashMap<String, FormatterFn> {
    let mut formatters: HashMap<String, FormatterFn> = HashMap::new();
    for suffix in ["px", "em", "rem", "ms", "deg"] {
        formatters.insert(suffix.to_string(), unit(suffix));
    }
    formatters.insert("percent".to_string(), Arc::new(percent));
    formatters
}

/// The `color` resolver: evaluates color expressions against the theme.
pub fn color_resolver(_prop: &str, value: &Value, ctx: &Context<'_>) -> Result<Value> {
    match value {
        Value::String(input) if !is_css_keyword(input) => {
            Ok(Value::String(ctx.theme().evaluate_color(input)?))
        }
        other => Ok(other.clone()),
    }
}

/// The `boxShadow` resolver: evaluates the colors inside a shadow list.
///
/// Named shadows under the property's theme key are looked up first.
pub fn box_shadow_resolver(prop: &str, value: &Value, ctx: &Context<'_>) -> Result<Value> {
    let value = lookup_theme_key(ctx.settings(), prop, value).unwrap_or_else(|| value.clone());
    match value {
        Value::String(input) if !is_css_keyword(&input) => {
            let shadow = parse_box_shadow(&input)?;
            Ok(Value::String(shadow.evaluate(ctx.theme(), &SrgbMath)?))
        }
        other => Ok(other),
    }
}

pub(crate) fn resolvers() -> HashMap<String, ResolverFn> {
    let mut resolvers: HashMap<String, ResolverFn> = HashMap::new();
    resolvers.insert(THEME_KEY.to_string(), Arc::new(theme_key_resolver));
    resolvers.insert("color".to_string(), Arc::new(color_resolver));
    resolvers.insert("boxShadow".to_string(), Arc::new(box_shadow_resolver));
    resolvers
}

/// Sheets named by a whitespace- or comma-separated list, looked up in the
/// theme setting `group`. Unknown names are skipped with a warning.
fn named_sheets(group: &str, value: Option<&Value>, ctx: &Context<'_>) -> Vec<StyleSheet> {
    let Some(Value::String(names)) = value else {
        return Vec::new();
    };
    let table = ctx.setting(group).and_then(Value::as_sheet);
    names
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|name| !name.is_empty())
        .filter_map(|name| match table.and_then(|t| t.get(name)) {
            Some(Value::Sheet(sheet)) => Some(sheet.clone()),
            _ => {
                warn!("{} entry \"{}\" is not defined in the theme", group, name);
                None
            }
        })
        .collect()
}

/// The `extends` styler: applies theme mixins beneath the sheet's own styles.
pub fn extends_styler(_prop: &str, value: Option<&Value>, ctx: &Context<'_>) -> Result<Styled> {
    let mixins = named_sheets("mixins", value, ctx);
    Ok(Styled::Pre(depth_first_object_merge(&mixins)))
}

/// The `face` styler: applies theme faces over the sheet's own styles.
pub fn face_styler(_prop: &str, value: Option<&Value>, ctx: &Context<'_>) -> Result<Styled> {
    let faces = named_sheets("faces", value, ctx);
    Ok(Styled::Post(depth_first_object_merge(&faces)))
}

pub(crate) fn stylers() -> HashMap<String, StylerSpec> {
    let mut stylers = HashMap::new();
    stylers.insert(CATCH_ALL.to_string(), StylerSpec::new());
    stylers.insert("extends".to_string(), StylerSpec::new().with_styler(extends_styler));
    stylers.insert("face".to_string(), StylerSpec::new().with_styler(face_styler));
    for prop in COLOR_PROPS {
        stylers.insert(prop.to_string(), StylerSpec::new().resolver("color"));
    }
    for prop in SHADOW_PROPS {
        stylers.insert(prop.to_string(), StylerSpec::new().resolver("boxShadow"));
    }
    stylers.insert(
        "size".to_string(),
        StylerSpec::new().output_props(["width", "height"]),
    );
    stylers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_formatters() {
        let f = formatters();
        assert_eq!(f["px"]("margin", &Value::from(8)), Value::from("8px"));
        assert_eq!(f["rem"]("fontSize", &Value::from(1.5)), Value::from("1.5rem"));
        assert_eq!(f["ms"]("transitionDuration", &Value::from(200)), Value::from("200ms"));
        assert_eq!(f["px"]("margin", &Value::from("auto")), Value::from("auto"));
        assert_eq!(f["px"]("margin", &Value::Null), Value::Null);
    }

    #[test]
    fn percent_formatter() {
        assert_eq!(percent("width", &Value::from(0.5)), Value::from("50%"));
        assert_eq!(percent("width", &Value::from(0.3)), Value::from("30%"));
        assert_eq!(percent("width", &Value::from(25)), Value::from("25%"));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert!(is_css_keyword("inherit"));
        assert!(is_css_keyword("currentcolor"));
        assert!(!is_css_keyword("primary"));
    }

    #[test]
    fn builtin_stylers_reference_builtin_resolvers() {
        let resolvers = resolvers();
        for spec in stylers().values() {
            if let Some(name) = &spec.resolver {
                assert!(resolvers.contains_key(name), "missing resolver {name}");
            }
        }
    }
}
