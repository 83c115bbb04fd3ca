use crate::layout::{PHI, Padding, TileMethod};
use crate::stats::{DEFAULT_MAX_ITEMS, DEFAULT_RECENCY_DAYS, SizeScale};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_OMITTED_LANGUAGES: [&str; 11] = [
    "CSS",
    "SCSS",
    "HTML",
    "Assembly",
    "Yacc",
    "Lex",
    "Makefile",
    "CMake",
    "TeX",
    "PostScript",
    "Cypher",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub tile: TileMethod,
    /// Target aspect ratio for squarified rows.
    pub ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 246.0,
            padding: Padding::default(),
            tile: TileMethod::default(),
            ratio: PHI,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsConfig {
    pub omitted_languages: Vec<String>,
    pub max_items: usize,
    pub size_scale: SizeScale,
    pub recency_days: i64,
    pub include_private: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            omitted_languages: DEFAULT_OMITTED_LANGUAGES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            max_items: DEFAULT_MAX_ITEMS,
            size_scale: SizeScale::default(),
            recency_days: DEFAULT_RECENCY_DAYS,
            include_private: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Optional backdrop; the SVG is transparent without it.
    pub background: Option<String>,
    /// Pixel density multiplier for PNG export.
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: None,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub stats: StatsConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f64>,
    font_weight: Option<u16>,
    luminosity_threshold: Option<f64>,
    light_text_color: Option<String>,
    light_text_secondary_color: Option<String>,
    dark_text_color: Option<String>,
    dark_text_secondary_color: Option<String>,
    label_x: Option<f64>,
    name_y: Option<f64>,
    percent_y: Option<f64>,
    corner_radius: Option<f64>,
    corner_smoothing: Option<f64>,
    preserve_smoothing: Option<bool>,
    missing_color: Option<String>,
    clip_id_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaddingConfigFile {
    inner: Option<f64>,
    vertical: Option<f64>,
    horizontal: Option<f64>,
    top: Option<f64>,
    right: Option<f64>,
    bottom: Option<f64>,
    left: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<PaddingConfigFile>,
    tile: Option<TileMethod>,
    ratio: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsConfigFile {
    omitted_languages: Option<Vec<String>>,
    max_items: Option<usize>,
    size_scale: Option<SizeScale>,
    /// Shorthand for `sizeScale: { kind: "power", exponent }`.
    size_exponent: Option<f64>,
    recency_days: Option<i64>,
    include_private: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    background: Option<String>,
    scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    stats: Option<StatsConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Merges a JSON5 document over the defaults. Absent keys keep their default.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "github" | "default" => config.theme = Theme::github(),
            "plain" => config.theme = Theme::plain(),
            other => anyhow::bail!("unknown theme `{other}`"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            theme.font_size = v;
        }
        if let Some(v) = vars.font_weight {
            theme.font_weight = v;
        }
        if let Some(v) = vars.luminosity_threshold {
            theme.luminosity_threshold = v;
        }
        if let Some(v) = vars.light_text_color {
            theme.light_text.primary = v;
        }
        if let Some(v) = vars.light_text_secondary_color {
            theme.light_text.secondary = v;
        }
        if let Some(v) = vars.dark_text_color {
            theme.dark_text.primary = v;
        }
        if let Some(v) = vars.dark_text_secondary_color {
            theme.dark_text.secondary = v;
        }
        if let Some(v) = vars.label_x {
            theme.label_x = v;
        }
        if let Some(v) = vars.name_y {
            theme.name_y = v;
        }
        if let Some(v) = vars.percent_y {
            theme.percent_y = v;
        }
        if let Some(v) = vars.corner_radius {
            theme.corner_radius = v;
        }
        if let Some(v) = vars.corner_smoothing {
            theme.corner_smoothing = v;
        }
        if let Some(v) = vars.preserve_smoothing {
            theme.preserve_smoothing = v;
        }
        if let Some(v) = vars.missing_color {
            theme.missing_color = v;
        }
        if let Some(v) = vars.clip_id_prefix {
            theme.clip_id_prefix = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.width {
            config.layout.width = v;
        }
        if let Some(v) = layout.height {
            config.layout.height = v;
        }
        if let Some(padding) = layout.padding {
            let current = config.layout.padding;
            let inner = padding.inner.unwrap_or(current.inner);
            let vertical = padding.vertical;
            let horizontal = padding.horizontal;
            config.layout.padding = Padding {
                inner,
                top: padding.top.or(vertical).unwrap_or(current.top),
                right: padding.right.or(horizontal).unwrap_or(current.right),
                bottom: padding.bottom.or(vertical).unwrap_or(current.bottom),
                left: padding.left.or(horizontal).unwrap_or(current.left),
            };
        }
        if let Some(v) = layout.tile {
            config.layout.tile = v;
        }
        if let Some(v) = layout.ratio {
            config.layout.ratio = v;
        }
    }

    if let Some(stats) = parsed.stats {
        if let Some(v) = stats.omitted_languages {
            config.stats.omitted_languages = v;
        }
        if let Some(v) = stats.max_items {
            config.stats.max_items = v;
        }
        if let Some(exponent) = stats.size_exponent {
            config.stats.size_scale = SizeScale::Power { exponent };
        }
        if let Some(v) = stats.size_scale {
            config.stats.size_scale = v;
        }
        if let Some(v) = stats.recency_days {
            config.stats.recency_days = v;
        }
        if let Some(v) = stats.include_private {
            config.stats.include_private = v;
        }
    }

    if let Some(render) = parsed.render {
        if render.background.is_some() {
            config.render.background = render.background;
        }
        if let Some(v) = render.scale {
            config.render.scale = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_github_card() {
        let config = Config::default();
        assert_eq!(config.layout.width, 900.0);
        assert_eq!(config.layout.height, 246.0);
        assert_eq!(config.layout.padding.inner, 4.0);
        assert_eq!(config.layout.tile, TileMethod::Resquarify);
        assert_eq!(config.stats.max_items, 12);
        assert_eq!(config.stats.recency_days, 730);
        assert!(config.stats.omitted_languages.iter().any(|l| l == "Cypher"));
        assert_eq!(config.theme, Theme::github());
    }

    #[test]
    fn missing_path_yields_defaults() {
        assert_eq!(load_config(None).unwrap(), Config::default());
    }

    #[test]
    fn partial_file_only_overrides_present_keys() {
        let config = parse_config(
            r##"{
                // comments and trailing commas are fine
                layout: { width: 400, padding: { vertical: 8 }, tile: "slice-dice" },
                stats: { maxItems: 3, omittedLanguages: [], sizeExponent: 1 },
                themeVariables: { cornerSmoothing: 0, missingColor: "#888" },
            }"##,
        )
        .unwrap();
        assert_eq!(config.layout.width, 400.0);
        assert_eq!(config.layout.height, 246.0);
        assert_eq!(config.layout.padding.top, 8.0);
        assert_eq!(config.layout.padding.bottom, 8.0);
        assert_eq!(config.layout.padding.left, 0.0);
        assert_eq!(config.layout.padding.inner, 4.0);
        assert_eq!(config.layout.tile, TileMethod::SliceDice);
        assert_eq!(config.stats.max_items, 3);
        assert!(config.stats.omitted_languages.is_empty());
        assert_eq!(config.stats.size_scale, SizeScale::Power { exponent: 1.0 });
        assert_eq!(config.theme.corner_smoothing, 0.0);
        assert_eq!(config.theme.missing_color, "#888");
        assert_eq!(config.theme.corner_radius, 6.0);
    }

    #[test]
    fn explicit_size_scale_wins_over_exponent() {
        let config = parse_config(r#"{ stats: { sizeExponent: 0.5, sizeScale: { kind: "log" } } }"#)
            .unwrap();
        assert_eq!(config.stats.size_scale, SizeScale::Log);
    }

    #[test]
    fn named_theme_is_applied_before_variables() {
        let config =
            parse_config(r#"{ theme: "plain", themeVariables: { cornerRadius: 2 } }"#).unwrap();
        assert_eq!(config.theme.corner_smoothing, 0.0);
        assert_eq!(config.theme.corner_radius, 2.0);
    }

    #[test]
    fn rejects_unknown_theme_and_bad_syntax() {
        assert!(parse_config(r#"{ theme: "neon" }"#).is_err());
        assert!(parse_config("{ layout: ").is_err());
    }
}
