use crate::layout::Layout;
use crate::stats::{LanguageTotals, share_percent, total_size};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub total_size: u64,
    pub tiles: Vec<TileDump>,
    /// Accepted languages that did not make the cut, largest first.
    pub hidden: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TileDump {
    pub name: String,
    pub color: Option<String>,
    pub size: u64,
    pub weight: f64,
    pub percent: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, totals: &LanguageTotals) -> Self {
        let total = total_size(totals);
        let tiles: Vec<TileDump> = layout
            .tiles
            .iter()
            .map(|tile| {
                let size = totals.get(&tile.name).map(|t| t.size).unwrap_or(0);
                TileDump {
                    name: tile.name.clone(),
                    color: tile.color.clone(),
                    size,
                    weight: tile.weight,
                    percent: share_percent(size, total),
                    x: tile.rect.x0,
                    y: tile.rect.y0,
                    width: tile.rect.width(),
                    height: tile.rect.height(),
                }
            })
            .collect();

        let mut hidden: Vec<(&String, u64)> = totals
            .iter()
            .filter(|(name, _)| !tiles.iter().any(|tile| &tile.name == *name))
            .map(|(name, t)| (name, t.size))
            .collect();
        hidden.sort_by(|a, b| b.1.cmp(&a.1));

        LayoutDump {
            width: layout.width,
            height: layout.height,
            total_size: total,
            tiles,
            hidden: hidden.into_iter().map(|(name, _)| name.clone()).collect(),
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &Layout,
    totals: &LanguageTotals,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, totals);
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
