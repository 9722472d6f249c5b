//! Theme factories built around spacing and typography scales.
//!
//! [`create_scale_theme`] installs `space`, `fontSize` and `lineHeight`
//! scales in the theme settings, with resolvers and stylers for the
//! margin/padding family, gaps, insets and type. The n-point factories derive
//! those scales from a base font size and a grid unit:
//!
//! ```rust
//! use swatch::{create_n_point_font_scale_theme, NPointFontScaleOptions, StyleSheet, ThemeOptions, Value};
//!
//! let font = NPointFontScaleOptions::from_yaml("baseFontSize: 16\nn: 4\n").unwrap();
//! let theme = create_n_point_font_scale_theme(&font, ThemeOptions::new()).unwrap();
//!
//! let sheet = StyleSheet::new().with("fontSize", 1).with("mx", 2);
//! let resolved = theme.resolve_style_sheet(&sheet, 0).unwrap();
//! assert_eq!(resolved.get("fontSize"), Some(&Value::from("18px")));
//! assert_eq!(resolved.get("marginLeft"), Some(&Value::from("4px")));
//! assert_eq!(resolved.get("marginRight"), Some(&Value::from("4px")));
//! assert!(resolved.get("mx").is_none());
//! ```

use std::sync::Arc;

use serde::Deserialize;

use crate::context::Context;
use crate::error::{Result, StyleError};
use crate::merge::merge_pair;
use crate::scale::{get_scale_value, Scale};
use crate::styler::{ResolverFn, StylerSpec};
use crate::theme::theme_key::lookup;
use crate::theme::{create_theme, Theme, ThemeOptions};
use crate::value::{StyleSheet, Value};

/// Font sizes used when an n-point theme does not list its own.
pub const DEFAULT_FONT_SIZES: &[f64] = &[10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 24.0, 30.0, 36.0, 48.0, 60.0, 72.0];

/// Style properties resolved on the `space` scale, with their outputs.
const SPACE_PROPS: &[(&str, &[&str])] = &[
    ("m", &["margin"]),
    ("margin", &["margin"]),
    ("mt", &["marginTop"]),
    ("marginTop", &["marginTop"]),
    ("mr", &["marginRight"]),
    ("marginRight", &["marginRight"]),
    ("mb", &["marginBottom"]),
    ("marginBottom", &["marginBottom"]),
    ("ml", &["marginLeft"]),
    ("marginLeft", &["marginLeft"]),
    ("mx", &["marginLeft", "marginRight"]),
    ("marginX", &["marginLeft", "marginRight"]),
    ("my", &["marginTop", "marginBottom"]),
    ("marginY", &["marginTop", "marginBottom"]),
    ("p", &["padding"]),
    ("padding", &["padding"]),
    ("pt", &["paddingTop"]),
    ("paddingTop", &["paddingTop"]),
    ("pr", &["paddingRight"]),
    ("paddingRight", &["paddingRight"]),
    ("pb", &["paddingBottom"]),
    ("paddingBottom", &["paddingBottom"]),
    ("pl", &["paddingLeft"]),
    ("paddingLeft", &["paddingLeft"]),
    ("px", &["paddingLeft", "paddingRight"]),
    ("paddingX", &["paddingLeft", "paddingRight"]),
    ("py", &["paddingTop", "paddingBottom"]),
    ("paddingY", &["paddingTop", "paddingBottom"]),
    ("gap", &["gap"]),
    ("rowGap", &["rowGap"]),
    ("columnGap", &["columnGap"]),
    ("top", &["top"]),
    ("right", &["right"]),
    ("bottom", &["bottom"]),
    ("left", &["left"]),
];

/// Scales installed by [`create_scale_theme`]. A missing scale is simply not
/// installed; its properties then pass values through.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScaleThemeOptions {
    pub space: Option<Scale<f64>>,
    pub font_size: Option<Scale<f64>>,
    pub line_height: Option<Scale<f64>>,
}

impl ScaleThemeOptions {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// The `space` resolver: whole numbers are positions on the `space` scale,
/// negative positions negating the value. Anything else is looked up as a
/// theme key under `space` or passed through.
pub fn space_resolver(_prop: &str, value: &Value, ctx: &Context<'_>) -> Result<Value> {
    let Some(node) = ctx.setting("space") else {
        return Ok(value.clone());
    };
    if let (Value::Scale(scale), Some(position)) = (node, value.as_position()) {
        if let Some(Value::Number(step)) = get_scale_value(scale, position.saturating_abs()) {
            return Ok(Value::Number(if position < 0 { -step } else { *step }));
        }
    }
    Ok(lookup(node, value).unwrap_or_else(|| value.clone()))
}

fn scale_resolver(setting: &'static str) -> ResolverFn {
    Arc::new(move |_: &str, value: &Value, ctx: &Context<'_>| {
        Ok(ctx
            .setting(setting)
            .and_then(|node| lookup(node, value))
            .unwrap_or_else(|| value.clone()))
    })
}

/// The `gridTemplate` resolver: a count `n` becomes `n` equal tracks.
pub fn grid_template_resolver(_prop: &str, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
    match value.as_position() {
        Some(count) if count > 0 => Ok(Value::String(format!(
            "repeat({}, minmax(0, 1fr))",
            count
        ))),
        _ => Ok(value.clone()),
    }
}

fn base_options() -> ThemeOptions {
    let mut options = ThemeOptions::new();
    options
        .resolvers
        .insert("space".to_string(), Arc::new(space_resolver));
    options
        .resolvers
        .insert("fontSize".to_string(), scale_resolver("fontSize"));
    options
        .resolvers
        .insert("lineHeight".to_string(), scale_resolver("lineHeight"));
    options
        .resolvers
        .insert("gridTemplate".to_string(), Arc::new(grid_template_resolver));

    for (name, outputs) in SPACE_PROPS {
        options.stylers.insert(
            name.to_string(),
            StylerSpec::new()
                .resolver("space")
                .format("px")
                .output_props(outputs.iter().copied()),
        );
    }
    for name in ["fontSize", "lineHeight"] {
        options.stylers.insert(
            name.to_string(),
            StylerSpec::new().resolver(name).format("px"),
        );
    }
    for name in ["gridTemplateColumns", "gridTemplateRows"] {
        options
            .stylers
            .insert(name.to_string(), StylerSpec::new().resolver("gridTemplate"));
    }
    options
}

/// Builds a theme with spacing and typography scales.
///
/// Formatters, resolvers, stylers and settings in `options` are layered over
/// the scale theme's own.
pub fn create_scale_theme(scales: ScaleThemeOptions, options: ThemeOptions) -> Result<Theme> {
    let mut settings = StyleSheet::new();
    if let Some(space) = scales.space {
        settings = settings.with("space", space);
    }
    if let Some(font_size) = scales.font_size {
        settings = settings.with("fontSize", font_size);
    }
    if let Some(line_height) = scales.line_height {
        settings = settings.with("lineHeight", line_height);
    }

    let mut merged = base_options();
    merged.formatters.extend(options.formatters);
    merged.resolvers.extend(options.resolvers);
    merged.stylers.extend(options.stylers);
    merged.settings = merge_pair(&settings, &options.settings);
    merged.color_cache_size = options.color_cache_size;
    create_theme(merged)
}

/// Options for [`create_n_point_font_scale_theme`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NPointFontScaleOptions {
    /// Required.
    pub base_font_size: Option<f64>,
    /// Grid unit; defaults to 4.
    pub n: Option<f64>,
    /// Available font sizes; defaults to [`DEFAULT_FONT_SIZES`].
    pub font_sizes: Option<Vec<f64>>,
    /// Defaults to 1.5.
    pub line_height_ratio: Option<f64>,
}

impl NPointFontScaleOptions {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Derives the theme scales.
    ///
    /// # Errors
    ///
    /// `Please set up baseFontSize` when the base size is missing or not
    /// positive.
    pub fn scales(&self) -> Result<ScaleThemeOptions> {
        let base = required_base(self.base_font_size)?;
        let n = grid_unit(self.n)?;

        let mut sizes = self
            .font_sizes
            .clone()
            .unwrap_or_else(|| DEFAULT_FONT_SIZES.to_vec());
        sizes.retain(|size| size.is_finite() && *size > 0.0);
        if !sizes.iter().any(|size| (size - base).abs() < f64::EPSILON) {
            sizes.push(base);
        }
        sizes.sort_by(f64::total_cmp);
        sizes.dedup();
        let offset = sizes
            .iter()
            .position(|size| (size - base).abs() < f64::EPSILON)
            .unwrap_or(0);

        Ok(n_point_scales(sizes, offset, n, self.line_height_ratio))
    }
}

/// Options for [`create_n_point_modular_scale_theme`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NPointModularScaleOptions {
    /// Required.
    pub base_font_size: Option<f64>,
    /// Ratio between neighbouring sizes; defaults to 1.25.
    pub ratio: Option<f64>,
    /// Grid unit; defaults to 4.
    pub n: Option<f64>,
    /// Sizes below the base; defaults to 2.
    pub steps_below: Option<usize>,
    /// Sizes above the base; defaults to 6.
    pub steps_above: Option<usize>,
    /// Defaults to 1.5.
    pub line_height_ratio: Option<f64>,
}

impl NPointModularScaleOptions {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Derives the theme scales: `base * ratio^k`, rounded to whole pixels.
    pub fn scales(&self) -> Result<ScaleThemeOptions> {
        let base = required_base(self.base_font_size)?;
        let n = grid_unit(self.n)?;
        let ratio = self.ratio.unwrap_or(1.25);
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(StyleError::InvalidOptions(format!(
                "ratio must be a positive number, got {}",
                ratio
            )));
        }
        let below = self.steps_below.unwrap_or(2);
        let lowest = step_count("stepsBelow", below)?;
        let highest = step_count("stepsAbove", self.steps_above.unwrap_or(6))?;

        let sizes = (-lowest..=highest)
            .map(|k| (base * ratio.powi(k)).round())
            .collect();

        Ok(n_point_scales(sizes, below, n, self.line_height_ratio))
    }
}

fn required_base(base: Option<f64>) -> Result<f64> {
    base.filter(|b| b.is_finite() && *b > 0.0)
        .ok_or(StyleError::MissingSetting("baseFontSize"))
}

/// Largest number of modular steps on either side of the base size.
const MAX_STEPS: usize = 64;

fn step_count(name: &str, steps: usize) -> Result<i32> {
    i32::try_from(steps)
        .ok()
        .filter(|_| steps <= MAX_STEPS)
        .ok_or_else(|| {
            StyleError::InvalidOptions(format!(
                "{} must be at most {}, got {}",
                name, MAX_STEPS, steps
            ))
        })
}

fn grid_unit(n: Option<f64>) -> Result<f64> {
    let n = n.unwrap_or(4.0);
    if n.is_finite() && n > 0.0 {
        Ok(n)
    } else {
        Err(StyleError::InvalidOptions(format!(
            "n must be a positive number, got {}",
            n
        )))
    }
}

fn n_point_scales(sizes: Vec<f64>, offset: usize, n: f64, ratio: Option<f64>) -> ScaleThemeOptions {
    let ratio = ratio.unwrap_or(1.5);
    let line_heights = sizes
        .iter()
        .map(|size| (size * ratio / n).ceil() * n)
        .collect();
    let space = [0.0, 0.5, 1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 12.0, 16.0]
        .iter()
        .map(|step| step * n)
        .collect();
    ScaleThemeOptions {
        space: Some(Scale::new(space, 0)),
        font_size: Some(Scale::new(sizes, offset)),
        line_height: Some(Scale::new(line_heights, offset)),
    }
}

/// Builds a scale theme from an n-point font scale.
pub fn create_n_point_font_scale_theme(
    font: &NPointFontScaleOptions,
    options: ThemeOptions,
) -> Result<Theme> {
    create_scale_theme(font.scales()?, options)
}

/// Builds a scale theme from an n-point modular scale.
pub fn create_n_point_modular_scale_theme(
    modular: &NPointModularScaleOptions,
    options: ThemeOptions,
) -> Result<Theme> {
    create_scale_theme(modular.scales()?, options)
}
