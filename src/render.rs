use crate::color::Rgb;
use crate::config::RenderConfig;
use crate::error::{LangstatError, Result};
use crate::layout::{Layout, TileLayout};
use crate::squircle::{SquircleParams, squircle_path};
use crate::stats::{LanguageTotals, share_percent, total_size};
use crate::theme::Theme;
use std::path::Path;

/// Formats a coordinate with at most four decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut text = format!("{value:.4}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// `100`, `33.3`, `0`: one decimal, dropped when it is zero.
pub fn format_percent(percent: f64) -> String {
    if (percent - percent.round()).abs() < 1e-9 {
        format!("{}", percent.round() as i64)
    } else {
        format!("{percent:.1}")
    }
}

/// Text fills for a tile, picked from its background luminosity.
pub fn tile_text_colors<'a>(
    theme: &'a Theme,
    tile: &TileLayout,
) -> Result<(&'a str, &'a str, String)> {
    let fill = tile
        .color
        .clone()
        .unwrap_or_else(|| theme.missing_color.clone());
    let rgb: Rgb = fill
        .parse()
        .map_err(|source| LangstatError::InvalidColor {
            language: tile.name.clone(),
            source,
        })?;
    let colors = theme.text_colors(rgb.is_light(theme.luminosity_threshold));
    Ok((colors.primary.as_str(), colors.secondary.as_str(), fill))
}

pub fn render_svg(
    layout: &Layout,
    totals: &LanguageTotals,
    theme: &Theme,
    config: &RenderConfig,
) -> Result<String> {
    let mut svg = String::new();
    let width = fmt_num(layout.width);
    let height = fmt_num(layout.height);

    svg.push_str(&format!(
        "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\">",
    ));

    svg.push_str(&format!(
        "<style>text {{ font-family: {}; text-anchor: start; dominant-baseline: text-before-edge; font-size: {}px; font-weight: {}; }}</style>",
        escape_text(&theme.font_family),
        fmt_num(theme.font_size),
        theme.font_weight
    ));

    if let Some(background) = &config.background {
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(background)
        ));
    }

    let total = total_size(totals);
    let squircle = SquircleParams {
        corner_radius: theme.corner_radius,
        corner_smoothing: theme.corner_smoothing,
        preserve_smoothing: theme.preserve_smoothing,
    };

    for (idx, tile) in layout.tiles.iter().enumerate() {
        let (primary, secondary, fill) = tile_text_colors(theme, tile)?;
        let size = totals.get(&tile.name).map(|t| t.size).unwrap_or(0);
        let percent = format_percent(share_percent(size, total));
        let path = squircle_path(tile.rect.width(), tile.rect.height(), &squircle).to_string();
        let clip_id = format!("{}-{idx}", theme.clip_id_prefix);
        let name = escape_xml(&tile.name);
        let label_x = fmt_num(theme.label_x);

        svg.push_str(&format!(
            "<g transform=\"translate({}, {})\">\
             <clipPath id=\"{clip_id}\"><path d=\"{path}\"/></clipPath>\
             <path d=\"{path}\" fill=\"{}\"/>\
             <text clip-path=\"url(#{clip_id})\" x=\"{label_x}\" y=\"{}\" class=\"n\" fill=\"{}\">{name}</text>\
             <text clip-path=\"url(#{clip_id})\" x=\"{label_x}\" y=\"{}\" class=\"per\" fill=\"{}\">{percent}%</text>\
             </g>",
            fmt_num(tile.rect.x0),
            fmt_num(tile.rect.y0),
            escape_xml(&fill),
            fmt_num(theme.name_y),
            escape_xml(primary),
            fmt_num(theme.percent_y),
            escape_xml(secondary),
        ));
    }

    svg.push_str("</svg>");
    Ok(svg)
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> anyhow::Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = if render_cfg.scale > 0.0 { render_cfg.scale } else { 1.0 };
    let size = tree.size().to_int_size().scale_by(scale).ok_or_else(|| {
        LangstatError::Png(format!("cannot scale canvas by {scale}"))
    })?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| LangstatError::Png("failed to allocate pixmap".to_string()))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
