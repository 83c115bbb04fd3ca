use chrono::{DateTime, Utc};
use langstat_treemap::config::Config;
use langstat_treemap::layout::TileMethod;
use langstat_treemap::render_language_stats_json;
use langstat_treemap::theme::Theme;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreemapRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    max_items: Option<usize>,
    omitted_languages: Option<Vec<String>>,
    tile: Option<String>,
    include_private: Option<bool>,
}

fn build_config(options: TreemapRenderOptions) -> Result<Config, String> {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("plain") {
        config.theme = Theme::plain();
    }

    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(width) = options.width {
        config.layout.width = width;
    }
    if let Some(height) = options.height {
        config.layout.height = height;
    }
    if let Some(max_items) = options.max_items {
        config.stats.max_items = max_items;
    }
    if let Some(omitted) = options.omitted_languages {
        config.stats.omitted_languages = omitted;
    }
    if let Some(tile) = options.tile.as_deref() {
        config.layout.tile =
            TileMethod::from_name(tile).ok_or_else(|| format!("unknown tiling method `{tile}`"))?;
    }
    if let Some(include_private) = options.include_private {
        config.stats.include_private = include_private;
    }

    Ok(config)
}

fn render(data_json: &str, now: &str, options_json: Option<&str>) -> Result<String, String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<TreemapRenderOptions>(raw).map_err(|e| e.to_string())?,
        None => TreemapRenderOptions::default(),
    };
    let config = build_config(options)?;
    let now = DateTime::parse_from_rfc3339(now)
        .map_err(|e| e.to_string())?
        .with_timezone(&Utc);
    render_language_stats_json(data_json, &config, now).map_err(|e| e.to_string())
}

/// `now` is an RFC 3339 timestamp, usually `new Date().toISOString()`.
#[wasm_bindgen]
pub fn render_language_stats_svg(
    data_json: &str,
    now: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    render(data_json, now, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{TreemapRenderOptions, build_config, render};

    const DATA: &str = r##"{ "data": { "user": { "repositories": { "nodes": [
        { "visibility": "PUBLIC", "isTemplate": false, "archivedAt": null,
          "updatedAt": "2025-01-10T08:00:00Z",
          "languages": { "edges": [
            { "size": 5000, "node": { "name": "TypeScript", "color": "#3178c6" } },
            { "size": 2500, "node": { "name": "Rust", "color": "#dea584" } },
            { "size": 900, "node": { "name": "CSS", "color": "#663399" } }
          ] } }
    ] } } } }"##;

    #[test]
    fn renders_language_stats_from_graphql_body() {
        let svg = render(DATA, "2025-02-01T00:00:00Z", None)
            .expect("language stats should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("TypeScript"));
        assert!(svg.contains(">66.7%</text>"));
        assert!(!svg.contains("CSS"));
    }

    #[test]
    fn options_override_defaults() {
        let options: TreemapRenderOptions =
            serde_json::from_str(r#"{ "theme": "plain", "width": 300, "tile": "binary" }"#)
                .unwrap();
        let config = build_config(options).unwrap();
        assert_eq!(config.layout.width, 300.0);
        assert_eq!(config.theme.corner_smoothing, 0.0);

        let svg = render(DATA, "2025-02-01T00:00:00Z", Some(r#"{ "maxItems": 1 }"#)).unwrap();
        assert_eq!(svg.matches("<g ").count(), 1);
        assert!(render(DATA, "not a date", None).is_err());
    }
}
