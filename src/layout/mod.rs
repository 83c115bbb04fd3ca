mod hierarchy;
mod treemap;
pub(crate) mod types;
pub use hierarchy::*;
pub use treemap::*;
pub use types::*;

use crate::config::LayoutConfig;

/// Positions every node of `root` inside a `width` x `height` canvas.
///
/// Padding follows the usual treemap convention: the outer sides inset the
/// children of a node, and `inner / 2` is shaved off every child so adjacent
/// siblings end up `inner` apart while edge tiles stay flush with the outer
/// padding.
pub fn position_hierarchy(
    root: &mut HierarchyNode,
    width: f64,
    height: f64,
    padding: &Padding,
    tiler: &mut dyn Tiler,
) {
    root.rect = Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0));
    let mut path = Vec::new();
    position_node(root, 0, 0.0, padding, tiler, &mut path);
}

fn position_node(
    node: &mut HierarchyNode,
    depth: usize,
    pad: f64,
    padding: &Padding,
    tiler: &mut dyn Tiler,
    path: &mut Vec<String>,
) {
    node.rect = node.rect.inset(pad);
    if node.children.is_empty() {
        return;
    }

    let p = padding.inner.max(0.0) / 2.0;
    let Rect { x0, y0, x1, y1 } = node.rect;
    let bounds = Rect::new(
        x0 + padding.left - p,
        y0 + padding.top - p,
        x1 - (padding.right - p),
        y1 - (padding.bottom - p),
    )
    .normalized();

    tiler.tile(
        TileContext {
            depth,
            path: path.as_slice(),
        },
        &mut node.children,
        bounds,
    );

    for child in &mut node.children {
        path.push(child.name.clone());
        position_node(child, depth + 1, p, padding, tiler, path);
        path.pop();
    }
}

/// Tiles `root` over the configured canvas and flattens its leaves.
pub fn compute_layout(
    mut root: HierarchyNode,
    config: &LayoutConfig,
    tiler: &mut dyn Tiler,
) -> Layout {
    let width = config.width.max(0.0);
    let height = config.height.max(0.0);
    let canvas = Rect::new(0.0, 0.0, width, height);

    if root.is_leaf() {
        return Layout {
            width,
            height,
            tiles: Vec::new(),
        };
    }

    position_hierarchy(&mut root, width, height, &config.padding, tiler);

    let tiles: Vec<TileLayout> = root
        .leaves()
        .into_iter()
        .map(|leaf| {
            let rect = leaf.rect.clamp_to(canvas);
            if leaf.value > 0.0 && rect.area() <= 0.0 {
                tracing::warn!(name = %leaf.name, "tile collapsed to zero area after padding");
            }
            tracing::trace!(
                name = %leaf.name,
                x0 = rect.x0,
                y0 = rect.y0,
                x1 = rect.x1,
                y1 = rect.y1,
                "positioned tile"
            );
            TileLayout {
                name: leaf.name.clone(),
                color: leaf.color.clone(),
                weight: leaf.value,
                rect,
            }
        })
        .collect();

    tracing::debug!(tiles = tiles.len(), width, height, "computed treemap layout");
    Layout {
        width,
        height,
        tiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RenderItem;

    fn items(values: &[(&str, f64)]) -> Vec<RenderItem> {
        values
            .iter()
            .map(|(name, size)| RenderItem {
                name: name.to_string(),
                size: *size,
                color: Some("#123456".to_string()),
            })
            .collect()
    }

    fn layout_of(values: &[(&str, f64)], config: &LayoutConfig) -> Layout {
        let mut tiler = config.tile.tiler(config.ratio);
        compute_layout(build_hierarchy(&items(values)), config, tiler.as_mut())
    }

    #[test]
    fn single_tile_fills_padded_canvas() {
        let layout = layout_of(&[("Go", 100.0)], &LayoutConfig::default());
        assert_eq!(layout.tiles.len(), 1);
        let rect = layout.tiles[0].rect;
        assert!(rect.x0.abs() < 1e-9 && rect.y0.abs() < 1e-9);
        assert!((rect.x1 - 900.0).abs() < 1e-9);
        assert!((rect.y1 - 246.0).abs() < 1e-9);
    }

    #[test]
    fn outer_padding_insets_the_canvas() {
        let config = LayoutConfig {
            padding: Padding::symmetric(4.0, 10.0, 20.0),
            ..LayoutConfig::default()
        };
        let layout = layout_of(&[("Go", 1.0)], &config);
        let rect = layout.tiles[0].rect;
        assert!((rect.x0 - 20.0).abs() < 1e-9);
        assert!((rect.y0 - 10.0).abs() < 1e-9);
        assert!((rect.x1 - 880.0).abs() < 1e-9);
        assert!((rect.y1 - 236.0).abs() < 1e-9);
    }

    #[test]
    fn equal_weights_get_equal_areas_separated_by_inner_padding() {
        let layout = layout_of(&[("A", 50.0), ("B", 50.0)], &LayoutConfig::default());
        let (a, b) = (layout.tiles[0].rect, layout.tiles[1].rect);
        assert!((a.area() - b.area()).abs() < 1e-6);
        // 900 wide, 246 tall: the two tiles sit side by side with a 4px gap.
        assert!((b.x0 - a.x1 - 4.0).abs() < 1e-9);
    }

    #[test]
    fn tiles_stay_inside_canvas_and_never_overlap() {
        let values = [
            ("A", 900.0),
            ("B", 400.0),
            ("C", 300.0),
            ("D", 120.0),
            ("E", 60.0),
            ("F", 10.0),
            ("G", 1.0),
            ("H", 0.01),
        ];
        for method in [
            TileMethod::Squarify,
            TileMethod::Resquarify,
            TileMethod::Binary,
            TileMethod::Slice,
            TileMethod::Dice,
            TileMethod::SliceDice,
        ] {
            let config = LayoutConfig {
                tile: method,
                ..LayoutConfig::default()
            };
            let layout = layout_of(&values, &config);
            assert_eq!(layout.tiles.len(), values.len());
            for tile in &layout.tiles {
                let r = tile.rect;
                assert!(0.0 <= r.x0 && r.x0 <= r.x1 && r.x1 <= 900.0, "{method:?} {r:?}");
                assert!(0.0 <= r.y0 && r.y0 <= r.y1 && r.y1 <= 246.0, "{method:?} {r:?}");
            }
            for (i, a) in layout.tiles.iter().enumerate() {
                for b in &layout.tiles[i + 1..] {
                    assert!(a.rect.overlap_area(&b.rect) < 1e-9, "{method:?}");
                }
            }
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let values = [("A", 5.0), ("B", 5.0), ("C", 3.0), ("D", 1.0)];
        let first = layout_of(&values, &LayoutConfig::default());
        let second = layout_of(&values, &LayoutConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_and_zero_inputs_do_not_panic() {
        let empty = layout_of(&[], &LayoutConfig::default());
        assert!(empty.tiles.is_empty());

        let zeros = layout_of(&[("A", 0.0), ("B", 0.0)], &LayoutConfig::default());
        assert_eq!(zeros.tiles.len(), 2);
        assert!(zeros.tiles.iter().all(|tile| tile.rect.area() == 0.0));
    }

    fn stack(_ctx: TileContext<'_>, children: &mut [HierarchyNode], bounds: Rect) {
        slice(children, bounds);
    }

    #[test]
    fn functions_can_act_as_tilers() {
        let mut halves = stack;
        let root = build_hierarchy(&items(&[("A", 1.0), ("B", 1.0)]));
        let config = LayoutConfig {
            padding: Padding::symmetric(0.0, 0.0, 0.0),
            ..LayoutConfig::default()
        };
        let layout = compute_layout(root, &config, &mut halves);
        assert!((layout.tiles[0].rect.y1 - 123.0).abs() < 1e-9);
        assert!((layout.tiles[1].rect.x1 - 900.0).abs() < 1e-9);
    }
}
