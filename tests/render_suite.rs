use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use langstat_treemap::config::Config;
use langstat_treemap::ir::{LanguageStatsInput, User};
use langstat_treemap::stats::{RecencyFilter, aggregate, share_percent, total_size};
use langstat_treemap::{LangstatError, Treemap, TreemapOutput, render_language_stats};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

fn load(name: &str) -> User {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    serde_json::from_str::<LanguageStatsInput>(&input)
        .expect("fixture parse failed")
        .into_user()
}

fn compute(name: &str, config: Config) -> TreemapOutput {
    Treemap::new(config, now()).compute(&load(name))
}

struct Tile {
    name: String,
    percent: String,
    fill: String,
    name_fill: String,
}

/// Checks the document shape and returns the labelled tiles in order.
fn parse_svg(svg: &str, fixture: &str, config: &Config) -> Vec<Tile> {
    let doc = roxmltree::Document::parse(svg)
        .unwrap_or_else(|err| panic!("{fixture}: invalid XML: {err}"));
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "svg", "{fixture}");
    let width = config.layout.width.to_string();
    let height = config.layout.height.to_string();
    assert_eq!(root.attribute("width"), Some(width.as_str()), "{fixture}");
    assert_eq!(root.attribute("height"), Some(height.as_str()), "{fixture}");
    assert_eq!(
        root.attribute("viewBox"),
        Some(format!("0 0 {width} {height}").as_str()),
        "{fixture}"
    );

    let children: Vec<_> = root.children().filter(|n| n.is_element()).collect();
    assert_eq!(
        children.iter().filter(|n| n.has_tag_name("style")).count(),
        1,
        "{fixture}: expected one <style>"
    );

    let mut tiles = Vec::new();
    for group in children.iter().filter(|n| n.has_tag_name("g")) {
        let parts: Vec<_> = group.children().filter(|n| n.is_element()).collect();
        let clips: Vec<_> = parts.iter().filter(|n| n.has_tag_name("clipPath")).collect();
        let paths: Vec<_> = parts.iter().filter(|n| n.has_tag_name("path")).collect();
        let texts: Vec<_> = parts.iter().filter(|n| n.has_tag_name("text")).collect();
        assert_eq!(clips.len(), 1, "{fixture}: one clipPath per tile");
        assert_eq!(paths.len(), 1, "{fixture}: one filled path per tile");
        assert_eq!(texts.len(), 2, "{fixture}: two labels per tile");

        let clip_id = clips[0].attribute("id").expect("clip id");
        let clip_ref = format!("url(#{clip_id})");
        for text in &texts {
            assert_eq!(text.attribute("clip-path"), Some(clip_ref.as_str()), "{fixture}");
        }

        let percent = texts[1].text().unwrap_or_default();
        tiles.push(Tile {
            name: texts[0].text().unwrap_or_default().to_string(),
            percent: percent.trim_end_matches('%').to_string(),
            fill: paths[0].attribute("fill").unwrap_or_default().to_string(),
            name_fill: texts[0].attribute("fill").unwrap_or_default().to_string(),
        });
    }
    tiles
}

fn render(name: &str, config: &Config) -> Vec<Tile> {
    let svg = render_language_stats(&load(name), config, now()).expect("render failed");
    parse_svg(&svg, name, config)
}

#[test]
fn render_all_fixtures() {
    let config = Config::default();
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "empty.json",
        "equal_pair.json",
        "many_languages.json",
        "omitted_largest.json",
        "single_go.json",
        "three_languages.json",
    ];
    for fixture in candidates {
        let tiles = render(fixture, &config);
        assert!(tiles.len() <= config.stats.max_items, "{fixture}");
    }
}

#[test]
fn single_language_fills_the_canvas() {
    let config = Config::default();
    let tiles = render("single_go.json", &config);
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].name, "Go");
    assert_eq!(tiles[0].percent, "100");
    assert_eq!(tiles[0].fill, "#00ADD8");
    assert_eq!(tiles[0].name_fill, "#ffffff");

    let output = compute("single_go.json", config);
    let rect = output.layout.tiles[0].rect;
    assert!(rect.x0.abs() < 1e-9 && rect.y0.abs() < 1e-9);
    assert!((rect.x1 - 900.0).abs() < 1e-9 && (rect.y1 - 246.0).abs() < 1e-9);
}

#[test]
fn equal_sizes_get_equal_tiles() {
    let tiles = render("equal_pair.json", &Config::default());
    let labels: Vec<_> = tiles.iter().map(|t| (t.name.as_str(), t.percent.as_str())).collect();
    assert_eq!(labels, vec![("A", "50"), ("B", "50")]);

    let output = compute("equal_pair.json", Config::default());
    let (a, b) = (output.layout.tiles[0].rect, output.layout.tiles[1].rect);
    assert!((a.area() - b.area()).abs() < 1e-6);
}

#[test]
fn omitted_language_disappears_even_when_largest() {
    let tiles = render("omitted_largest.json", &Config::default());
    assert!(tiles.iter().all(|t| t.name != "CSS"));
    let labels: Vec<_> = tiles.iter().map(|t| (t.name.as_str(), t.percent.as_str())).collect();
    assert_eq!(labels, vec![("TypeScript", "75"), ("Rust", "25")]);

    let output = compute("omitted_largest.json", Config::default());
    assert!(!output.totals.contains_key("CSS"));
}

#[test]
fn max_items_one_keeps_only_the_largest() {
    let mut config = Config::default();
    config.stats.max_items = 1;
    let tiles = render("three_languages.json", &config);
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].name, "Rust");
    // Percentages are relative to every accepted language, not just the drawn ones.
    assert_eq!(tiles[0].percent, "50");

    let output = compute("three_languages.json", config);
    let rect = output.layout.tiles[0].rect;
    assert!((rect.width() - 900.0).abs() < 1e-9);
    assert!((rect.height() - 246.0).abs() < 1e-9);
}

#[test]
fn truncates_to_largest_raw_sizes() {
    let config = Config::default();
    let tiles = render("many_languages.json", &config);
    assert_eq!(tiles.len(), 12);
    let names: Vec<_> = tiles.iter().map(|t| t.name.as_str()).collect();
    for dropped in ["Rust", "TypeScript", "Go", "HTML", "Java", "Perl", "PHP"] {
        assert!(!names.contains(&dropped), "{dropped} should not be drawn");
    }
    let dockerfile = tiles.iter().find(|t| t.name == "Dockerfile").expect("Dockerfile tile");
    assert_eq!(dockerfile.fill, config.theme.missing_color);
    let javascript = tiles.iter().find(|t| t.name == "JavaScript").expect("JavaScript tile");
    assert_eq!(javascript.name_fill, "#000000ff");
}

#[test]
fn percentages_over_accepted_languages_sum_to_one_hundred() {
    let config = Config::default();
    let filter = RecencyFilter::from_config(now(), &config.stats);
    for fixture in ["three_languages.json", "omitted_largest.json", "many_languages.json"] {
        let user = load(fixture);
        let totals = aggregate(&user.repositories.nodes, &filter, &config.stats.omitted_languages);
        let total = total_size(&totals);
        let sum: f64 = totals.values().map(|t| share_percent(t.size, total)).sum();
        // Each label is rounded to a tenth, so it is off by at most 0.05.
        let tolerance = (0.05 * totals.len() as f64).max(0.1) + 1e-9;
        assert!((sum - 100.0).abs() <= tolerance, "{fixture}: sum = {sum}");
    }
}

#[test]
fn tiles_are_contained_and_disjoint() {
    let output = compute("many_languages.json", Config::default());
    let tiles = &output.layout.tiles;
    for tile in tiles {
        let r = tile.rect;
        assert!(0.0 <= r.x0 && r.x0 <= r.x1 && r.x1 <= 900.0, "{}: {r:?}", tile.name);
        assert!(0.0 <= r.y0 && r.y0 <= r.y1 && r.y1 <= 246.0, "{}: {r:?}", tile.name);
    }
    for (i, a) in tiles.iter().enumerate() {
        for b in &tiles[i + 1..] {
            assert!(a.rect.overlap_area(&b.rect) < 1e-9, "{} overlaps {}", a.name, b.name);
        }
    }
}

#[test]
fn private_repositories_can_be_excluded() {
    let mut config = Config::default();
    config.stats.include_private = false;
    let private_out = compute("many_languages.json", config);
    let with_private = compute("many_languages.json", Config::default());
    assert!(total_size(&private_out.totals) < total_size(&with_private.totals));
}

#[test]
fn output_is_deterministic() {
    let user = load("many_languages.json");
    let config = Config::default();
    let first = render_language_stats(&user, &config, now()).unwrap();
    let second = render_language_stats(&user, &config, now()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_input_renders_an_empty_canvas() {
    let tiles = render("empty.json", &Config::default());
    assert!(tiles.is_empty());
}

#[test]
fn malformed_color_is_reported() {
    let err = render_language_stats(&load("invalid_color.json"), &Config::default(), now())
        .unwrap_err();
    match err {
        LangstatError::InvalidColor { language, .. } => assert_eq!(language, "Mystery"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn stale_window_moves_with_reference_time() {
    // Three years later nothing in the fixture is recent any more.
    let later = Utc.with_ymd_and_hms(2028, 6, 1, 0, 0, 0).unwrap();
    let svg = render_language_stats(&load("single_go.json"), &Config::default(), later).unwrap();
    let tiles = parse_svg(&svg, "single_go.json", &Config::default());
    assert!(tiles.is_empty());
}
