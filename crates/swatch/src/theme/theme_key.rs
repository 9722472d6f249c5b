//! Theme-key lookups: mapping user values onto theme settings.
//!
//! For a property `prop`, the theme node `settings[prop]` is consulted:
//!
//! - a string is a dotted path (`"heading"`, `"primary.2"`, `"brand.accent"`)
//!   walked through nested sheets and scales;
//! - a whole number is a scale position (or a numeric key of a sheet);
//! - a scale reached at the end of a path yields its base value;
//! - an explicit `null` anywhere along the path means "turned off" and
//!   resolves to `null`.
//!
//! Values with no match pass through unchanged.

use crate::context::Context;
use crate::error::Result;
use crate::scale::get_scale_value;
use crate::value::{StyleSheet, Value};

/// The `themeKey` resolver.
pub fn theme_key_resolver(prop: &str, value: &Value, ctx: &Context<'_>) -> Result<Value> {
    Ok(lookup_theme_key(ctx.settings(), prop, value).unwrap_or_else(|| value.clone()))
}

/// Looks up `value` under `settings[prop]`. `None` when nothing matches.
pub fn lookup_theme_key(settings: &StyleSheet, prop: &str, value: &Value) -> Option<Value> {
    lookup(settings.get(prop)?, value)
}

/// Looks up `key` in a theme node.
pub fn lookup(node: &Value, key: &Value) -> Option<Value> {
    match (node, key) {
        (Value::Null, _) => Some(Value::Null),
        (_, Value::String(path)) => lookup_path(node, path),
        (Value::Scale(scale), Value::Number(_)) => {
            get_scale_value(scale, key.as_position()?).cloned()
        }
        (Value::Sheet(sheet), Value::Number(_)) => {
            sheet.get(&key.as_position()?.to_string()).cloned()
        }
        _ => None,
    }
}

/// Walks a dotted path from `node`.
///
/// ```rust
/// use swatch::{lookup_path, Scale, StyleSheet, Value};
///
/// let colors = Value::Sheet(StyleSheet::new().with(
///     "primary",
///     Scale::new(vec![Value::from("#ddd"), "#ccc".into(), "#bbb".into()], 1),
/// ));
/// assert_eq!(lookup_path(&colors, "primary"), Some(Value::from("#ccc")));
/// assert_eq!(lookup_path(&colors, "primary.-1"), Some(Value::from("#ddd")));
/// assert_eq!(lookup_path(&colors, "secondary"), None);
/// ```
pub fn lookup_path(node: &Value, path: &str) -> Option<Value> {
    let mut current = node;
    for segment in path.split('.') {
        current = match current {
            Value::Null => return Some(Value::Null),
            Value::Sheet(sheet) => sheet.get(segment)?,
            Value::Scale(scale) => get_scale_value(scale, segment.parse().ok()?)?,
            _ => return None,
        };
    }
    match current {
        Value::Scale(scale) => get_scale_value(scale, 0).cloned(),
        other => Some(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Scale;

    fn settings() -> StyleSheet {
        StyleSheet::new()
            .with(
                "space",
                Scale::new(vec![0.0, 4.0, 8.0, 16.0], 0),
            )
            .with(
                "fontFamily",
                StyleSheet::new().with("body", "Inter").with("mono", Value::Null),
            )
            .with(
                "textStyle",
                StyleSheet::new().with("heading", StyleSheet::new().with("fontSize", 3)),
            )
            .with("shadows", Value::Null)
            .with(
                "breakpoints",
                Value::from(vec![Value::from("40em"), Value::from("52em")]),
            )
            .with("zIndices", StyleSheet::new().with("1", 10).with("2", 20))
    }

    #[test]
    fn numeric_scale_positions() {
        let s = settings();
        assert_eq!(lookup_theme_key(&s, "space", &Value::from(2)), Some(Value::from(8.0)));
        assert_eq!(lookup_theme_key(&s, "space", &Value::from(99)), Some(Value::from(16.0)));
        assert_eq!(lookup_theme_key(&s, "space", &Value::from(1.5)), None);
    }

    #[test]
    fn numeric_keys_of_sheets() {
        let s = settings();
        assert_eq!(lookup_theme_key(&s, "zIndices", &Value::from(2)), Some(Value::from(20)));
    }

    #[test]
    fn string_paths() {
        let s = settings();
        assert_eq!(
            lookup_theme_key(&s, "fontFamily", &Value::from("body")),
            Some(Value::from("Inter"))
        );
        assert_eq!(lookup_theme_key(&s, "space", &Value::from("3")), Some(Value::from(16.0)));
        assert!(matches!(
            lookup_theme_key(&s, "textStyle", &Value::from("heading")),
            Some(Value::Sheet(_))
        ));
    }

    #[test]
    fn null_turns_values_off() {
        let s = settings();
        assert_eq!(lookup_theme_key(&s, "fontFamily", &Value::from("mono")), Some(Value::Null));
        assert_eq!(lookup_theme_key(&s, "fontFamily", &Value::from("mono.x")), Some(Value::Null));
        assert_eq!(lookup_theme_key(&s, "shadows", &Value::from("card")), Some(Value::Null));
    }

    #[test]
    fn arrays_are_returned_as_is() {
        let node = Value::Sheet(settings());
        assert_eq!(
            lookup_path(&node, "breakpoints"),
            Some(Value::from(vec![Value::from("40em"), Value::from("52em")]))
        );
    }

    #[test]
    fn unknown_paths_miss() {
        let s = settings();
        assert_eq!(lookup_theme_key(&s, "fontFamily", &Value::from("display")), None);
        assert_eq!(lookup_theme_key(&s, "color", &Value::from("red")), None);
        assert_eq!(lookup_theme_key(&s, "space", &Value::from("large")), None);
    }
}
