//! Resolution of whole style sheets.
//!
//! Each declaration is dispatched to its styler; the output is placed
//! according to its [`Styled`] variant:
//!
//! ```text
//! result = merge(pre..., own, post...)
//! ```
//!
//! so styles from `Post` stylers (faces) override the sheet's own styles,
//! which override `Pre` styles (mixins). Nested sheets (selectors such as
//! `&:hover`) are resolved recursively and assigned under their key.
//!
//! Results are memoized per theme, breakpoint and source sheet identity:
//! resolving the same sheet twice returns the same resolved sheet without
//! running any styler.

use log::trace;

use crate::context::Context;
use crate::error::Result;
use crate::merge::{depth_first_object_merge, merge_pair};
use crate::styler::Styled;
use crate::value::{StyleSheet, Value};

/// Resolves `sheet` in `ctx`, using the theme's memo.
pub fn resolve_style_sheet(sheet: &StyleSheet, ctx: &Context<'_>) -> Result<StyleSheet> {
    let memo = ctx.theme().resolution_cache();
    if let Some(hit) = memo.get(ctx.breakpoint(), sheet) {
        trace!(
            "resolution memo hit for sheet {:?} at breakpoint {}",
            sheet.id(),
            ctx.breakpoint()
        );
        return Ok(hit);
    }
    let resolved = resolve_uncached(sheet, ctx)?;
    memo.insert(ctx.breakpoint(), sheet, resolved.clone());
    Ok(resolved)
}

/// Resolves each sheet and merges the results; later sheets win.
pub fn resolve_style_sheets(sheets: &[StyleSheet], ctx: &Context<'_>) -> Result<StyleSheet> {
    let resolved = sheets
        .iter()
        .map(|sheet| resolve_style_sheet(sheet, ctx))
        .collect::<Result<Vec<_>>>()?;
    Ok(depth_first_object_merge(&resolved))
}

fn resolve_uncached(sheet: &StyleSheet, ctx: &Context<'_>) -> Result<StyleSheet> {
    let nested = ctx.nested()?;
    let mut pre = Vec::new();
    let mut own = StyleSheet::new();
    let mut post = Vec::new();

    for (key, value) in sheet.iter() {
        let selected = match value {
            Value::Sheet(_) => Some(value),
            other => other.at_breakpoint(ctx.breakpoint()),
        };
        if let Some(Value::Sheet(block)) = selected {
            let resolved = resolve_style_sheet(block, &nested)?;
            own = own.with(key, resolved);
            continue;
        }

        match nested.style(key, selected)? {
            Styled::Pre(styles) => pre.push(resolve_style_sheet(&styles, &nested)?),
            Styled::PreFinal(styles) => pre.push(styles),
            Styled::InPlace(styles) => {
                let resolved = resolve_style_sheet(&styles, &nested)?;
                own = merge_pair(&own, &resolved);
            }
            Styled::InPlaceFinal(styles) => own = merge_pair(&own, &styles),
            Styled::Post(styles) => post.push(resolve_style_sheet(&styles, &nested)?),
            Styled::PostFinal(styles) => post.push(styles),
        }
    }

    let mut layers = pre;
    layers.push(own);
    layers.extend(post);
    Ok(depth_first_object_merge(&layers))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::StyleError;
    use crate::styler::StylerSpec;
    use crate::theme::{Theme, ThemeOptions};

    fn placed(kind: fn(StyleSheet) -> Styled, prop: &'static str) -> StylerSpec {
        StylerSpec::new().with_styler(move |_, value, _| {
            let value = value.cloned().unwrap_or(Value::Null);
            Ok(kind(StyleSheet::new().with(prop, value)))
        })
    }

    fn ordering_theme() -> Theme {
        ThemeOptions::new()
            .styler("before", placed(Styled::PreFinal, "tone"))
            .styler("after", placed(Styled::PostFinal, "tone"))
            .build()
            .unwrap()
    }

    #[test]
    fn post_beats_own_beats_pre() {
        let theme = ordering_theme();
        let tone = |sheet: StyleSheet| {
            theme
                .resolve_style_sheet(&sheet, 0)
                .unwrap()
                .get("tone")
                .cloned()
        };

        let all = StyleSheet::new()
            .with("after", "post")
            .with("tone", "own")
            .with("before", "pre");
        assert_eq!(tone(all), Some(Value::from("post")));

        let own_and_pre = StyleSheet::new().with("before", "pre").with("tone", "own");
        assert_eq!(tone(own_and_pre), Some(Value::from("own")));

        let pre_only = StyleSheet::new().with("before", "pre");
        assert_eq!(tone(pre_only), Some(Value::from("pre")));
    }

    #[test]
    fn nested_blocks_are_resolved_and_assigned() {
        let theme = Theme::with_settings(
            StyleSheet::new().with("fontFamily", StyleSheet::new().with("body", "Inter")),
        )
        .unwrap();
        let sheet = StyleSheet::new()
            .with("fontFamily", "body")
            .with("&:hover", StyleSheet::new().with("fontFamily", "body"));
        let resolved = theme.resolve_style_sheet(&sheet, 0).unwrap();
        let hover = resolved.get("&:hover").and_then(Value::as_sheet).unwrap();
        assert_eq!(hover.get("fontFamily"), Some(&Value::from("Inter")));
        assert_eq!(resolved.keys().collect::<Vec<_>>(), ["fontFamily", "&:hover"]);
    }

    #[test]
    fn memoized_by_identity_and_breakpoint() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let theme = ThemeOptions::new()
            .styler(
                "counted",
                StylerSpec::new().with_styler(move |prop, value, ctx| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    crate::styler::default_styler(prop, value, ctx)
                }),
            )
            .build()
            .unwrap();
        let sheet = StyleSheet::new().with("counted", 1);

        let first = theme.resolve_style_sheet(&sheet, 0).unwrap();
        let second = theme.resolve_style_sheet(&sheet, 0).unwrap();
        assert!(first.same(&second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        theme.resolve_style_sheet(&sheet, 1).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let twin = StyleSheet::new().with("counted", 1);
        theme.resolve_style_sheet(&twin, 0).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn responsive_values_follow_breakpoint() {
        let theme = Theme::with_settings(StyleSheet::new()).unwrap();
        let sheet = StyleSheet::new().with(
            "width",
            Value::responsive([Some("100%".into()), None, Some("50%".into())]),
        );
        let at = |bp| theme.resolve_style_sheet(&sheet, bp).unwrap().get("width").cloned();
        assert_eq!(at(0), Some(Value::from("100%")));
        assert_eq!(at(1), Some(Value::from("100%")));
        assert_eq!(at(2), Some(Value::from("50%")));
    }

    #[test]
    fn resolve_many_later_wins() {
        let theme = Theme::with_settings(StyleSheet::new()).unwrap();
        let a = StyleSheet::new().with("width", 1).with("height", 1);
        let b = StyleSheet::new().with("width", 2);
        let resolved = theme.resolve_style_sheets(&[a, b], 0).unwrap();
        assert_eq!(resolved.get("width"), Some(&Value::from(2)));
        assert_eq!(resolved.get("height"), Some(&Value::from(1)));
    }

    #[test]
    fn self_including_mixin_hits_depth_limit() {
        let settings = StyleSheet::from_yaml("mixins:\n  loop:\n    extends: loop\n").unwrap();
        let theme = Theme::with_settings(settings).unwrap();
        let sheet = StyleSheet::new().with("extends", "loop");
        assert!(matches!(
            theme.resolve_style_sheet(&sheet, 0),
            Err(StyleError::TooDeep(_))
        ));
    }

    #[test]
    fn errors_propagate() {
        let theme = Theme::with_settings(StyleSheet::new()).unwrap();
        let sheet = StyleSheet::new().with("color", "color(nope alpha(1))");
        assert!(matches!(
            theme.resolve_style_sheet(&sheet, 0),
            Err(StyleError::Color(_))
        ));
    }
}
