use crate::config::{Config, load_config};
use crate::ir::LanguageStatsInput;
use crate::layout::TileMethod;
use crate::layout_dump::write_layout_dump;
use crate::pipeline::Treemap;
use crate::render::{render_svg, write_output_svg};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "langstat",
    version,
    about = "Render GitHub language statistics as a treemap SVG"
)]
pub struct Args {
    /// Input file (GraphQL response JSON) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Maximum number of tiles
    #[arg(short = 'n', long = "max-items")]
    pub max_items: Option<usize>,

    /// Extra languages to leave out (repeatable or comma separated)
    #[arg(long = "omit", value_delimiter = ',')]
    pub omit: Vec<String>,

    /// Tiling method: squarify, resquarify, binary, slice, dice, slice-dice
    #[arg(long = "tile", value_parser = parse_tile)]
    pub tile: Option<TileMethod>,

    /// Reference time for the recency window (RFC 3339). Defaults to now.
    #[arg(long = "now", value_parser = parse_now)]
    pub now: Option<DateTime<Utc>>,

    /// Write the computed tiles as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    let now = args.now.unwrap_or_else(Utc::now);

    let input = read_input(args.input.as_deref())?;
    let parsed: LanguageStatsInput =
        serde_json::from_str(&input).context("input is not a language statistics document")?;
    let user = parsed.into_user();

    let mut treemap = Treemap::new(config, now);
    let output = treemap.compute(&user);
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &output.layout, &output.totals)?;
    }

    let config = treemap.config();
    let svg = render_svg(&output.layout, &output.totals, &config.theme, &config.render)?;
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        #[cfg(feature = "png")]
        OutputFormat::Png => {
            let path = ensure_output(&args.output, "png")?;
            crate::render::write_output_png(&svg, &path, &config.render)?;
        }
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => {
            anyhow::bail!("PNG output requires the `png` feature");
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let directive = match verbose {
        0 => "langstat_treemap=info",
        1 => "langstat_treemap=debug",
        _ => "langstat_treemap=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(v) = args.width {
        config.layout.width = v;
    }
    if let Some(v) = args.height {
        config.layout.height = v;
    }
    if let Some(v) = args.max_items {
        config.stats.max_items = v;
    }
    if let Some(v) = args.tile {
        config.layout.tile = v;
    }
    for name in &args.omit {
        let name = name.trim();
        if !name.is_empty() && !config.stats.omitted_languages.iter().any(|l| l == name) {
            config.stats.omitted_languages.push(name.to_string());
        }
    }
}

fn parse_tile(value: &str) -> std::result::Result<TileMethod, String> {
    TileMethod::from_name(value).ok_or_else(|| format!("unknown tiling method `{value}`"))
}

fn parse_now(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| err.to_string())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
