use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{HierarchyNode, Rect};

/// Golden ratio, the default target aspect ratio for squarified rows.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Where in the tree a tiling call happens.
#[derive(Debug, Clone, Copy)]
pub struct TileContext<'a> {
    pub depth: usize,
    pub path: &'a [String],
}

/// Partitions `bounds` among `children` in proportion to their values.
///
/// Implementations must keep every child inside `bounds` and must not
/// reorder `children`.
pub trait Tiler {
    fn tile(&mut self, ctx: TileContext<'_>, children: &mut [HierarchyNode], bounds: Rect);
}

impl<F> Tiler for F
where
    F: FnMut(TileContext<'_>, &mut [HierarchyNode], Rect),
{
    fn tile(&mut self, ctx: TileContext<'_>, children: &mut [HierarchyNode], bounds: Rect) {
        self(ctx, children, bounds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileMethod {
    Squarify,
    #[default]
    Resquarify,
    Binary,
    Slice,
    Dice,
    SliceDice,
}

impl TileMethod {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "squarify" => Some(Self::Squarify),
            "resquarify" => Some(Self::Resquarify),
            "binary" => Some(Self::Binary),
            "slice" => Some(Self::Slice),
            "dice" => Some(Self::Dice),
            "slice-dice" | "slicedice" => Some(Self::SliceDice),
            _ => None,
        }
    }

    pub fn tiler(self, ratio: f64) -> Box<dyn Tiler> {
        match self {
            Self::Squarify => Box::new(Squarify::new(ratio)),
            Self::Resquarify => Box::new(Resquarify::new(ratio)),
            Self::Binary => Box::new(Binary),
            Self::Slice => Box::new(Slice),
            Self::Dice => Box::new(Dice),
            Self::SliceDice => Box::new(SliceDice),
        }
    }
}

fn sum_values(nodes: &[HierarchyNode]) -> f64 {
    nodes.iter().map(|node| node.value).sum()
}

/// Lays nodes out left to right, each spanning the full height.
pub fn dice(nodes: &mut [HierarchyNode], bounds: Rect) {
    let value = sum_values(nodes);
    let k = if value > 0.0 {
        (bounds.x1 - bounds.x0) / value
    } else {
        0.0
    };
    let mut x = bounds.x0;
    for node in nodes {
        let x1 = x + node.value * k;
        node.rect = Rect::new(x, bounds.y0, x1, bounds.y1);
        x = x1;
    }
}

/// Lays nodes out top to bottom, each spanning the full width.
pub fn slice(nodes: &mut [HierarchyNode], bounds: Rect) {
    let value = sum_values(nodes);
    let k = if value > 0.0 {
        (bounds.y1 - bounds.y0) / value
    } else {
        0.0
    };
    let mut y = bounds.y0;
    for node in nodes {
        let y1 = y + node.value * k;
        node.rect = Rect::new(bounds.x0, y, bounds.x1, y1);
        y = y1;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Dice;

impl Tiler for Dice {
    fn tile(&mut self, _ctx: TileContext<'_>, children: &mut [HierarchyNode], bounds: Rect) {
        dice(children, bounds);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Slice;

impl Tiler for Slice {
    fn tile(&mut self, _ctx: TileContext<'_>, children: &mut [HierarchyNode], bounds: Rect) {
        slice(children, bounds);
    }
}

/// Alternates by depth: dice at even depths, slice at odd ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceDice;

impl Tiler for SliceDice {
    fn tile(&mut self, ctx: TileContext<'_>, children: &mut [HierarchyNode], bounds: Rect) {
        if ctx.depth % 2 == 1 {
            slice(children, bounds);
        } else {
            dice(children, bounds);
        }
    }
}

/// Recursively halves the value range, cutting along the longer side.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

impl Tiler for Binary {
    fn tile(&mut self, _ctx: TileContext<'_>, children: &mut [HierarchyNode], bounds: Rect) {
        if children.is_empty() {
            return;
        }
        let mut sums = Vec::with_capacity(children.len() + 1);
        sums.push(0.0);
        let mut acc = 0.0;
        for child in children.iter() {
            acc += child.value;
            sums.push(acc);
        }
        let n = children.len();
        binary_partition(children, &sums, 0, n, acc, bounds);
    }
}

fn binary_partition(
    nodes: &mut [HierarchyNode],
    sums: &[f64],
    i: usize,
    j: usize,
    value: f64,
    rect: Rect,
) {
    if i + 1 >= j {
        nodes[i].rect = rect;
        return;
    }

    let value_offset = sums[i];
    let value_target = value / 2.0 + value_offset;
    let mut k = i + 1;
    let mut hi = j - 1;
    while k < hi {
        let mid = (k + hi) / 2;
        if sums[mid] < value_target {
            k = mid + 1;
        } else {
            hi = mid;
        }
    }
    if value_target - sums[k - 1] < sums[k] - value_target && i + 1 < k {
        k -= 1;
    }

    let value_left = sums[k] - value_offset;
    let value_right = value - value_left;
    let Rect { x0, y0, x1, y1 } = rect;
    if x1 - x0 > y1 - y0 {
        let xk = if value > 0.0 {
            (x0 * value_right + x1 * value_left) / value
        } else {
            x1
        };
        binary_partition(nodes, sums, i, k, value_left, Rect::new(x0, y0, xk, y1));
        binary_partition(nodes, sums, k, j, value_right, Rect::new(xk, y0, x1, y1));
    } else {
        let yk = if value > 0.0 {
            (y0 * value_right + y1 * value_left) / value
        } else {
            y1
        };
        binary_partition(nodes, sums, i, k, value_left, Rect::new(x0, y0, x1, yk));
        binary_partition(nodes, sums, k, j, value_right, Rect::new(x0, yk, x1, y1));
    }
}

/// One strip of a squarified layout: `len` consecutive children laid out
/// along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub dice: bool,
    pub len: usize,
}

fn place_row(row: &mut [HierarchyNode], dice_row: bool, row_value: f64, value: f64, rest: &mut Rect) {
    if dice_row {
        let y = if value > 0.0 {
            rest.y0 + (rest.y1 - rest.y0) * row_value / value
        } else {
            rest.y1
        };
        dice(row, Rect::new(rest.x0, rest.y0, rest.x1, y));
        rest.y0 = y;
    } else {
        let x = if value > 0.0 {
            rest.x0 + (rest.x1 - rest.x0) * row_value / value
        } else {
            rest.x1
        };
        slice(row, Rect::new(rest.x0, rest.y0, x, rest.y1));
        rest.x0 = x;
    }
}

/// Squarified tiling (Bruls, Huizing, van Wijk): grows each row while the
/// worst aspect ratio in it keeps improving relative to `ratio`.
pub fn squarify_rows(ratio: f64, nodes: &mut [HierarchyNode], bounds: Rect) -> Vec<Row> {
    let n = nodes.len();
    let mut rows = Vec::new();
    let mut rest = bounds;
    let mut i0 = 0;

    while i0 < n {
        let dx = rest.x1 - rest.x0;
        let dy = rest.y1 - rest.y0;
        let value = sum_values(&nodes[i0..]);

        if !(value > 0.0 && dx > 0.0 && dy > 0.0) {
            // Nothing left to balance: park the remainder in one degenerate row.
            let dice_row = dx < dy;
            let row_value = value.max(0.0);
            place_row(&mut nodes[i0..], dice_row, row_value, value.max(0.0), &mut rest);
            rows.push(Row {
                dice: dice_row,
                len: n - i0,
            });
            break;
        }

        // Leading zero-valued nodes ride along with the next non-empty one.
        let mut i1 = i0;
        let mut sum_value = 0.0;
        while i1 < n {
            sum_value = nodes[i1].value;
            i1 += 1;
            if sum_value > 0.0 {
                break;
            }
        }

        let mut min_value = sum_value;
        let mut max_value = sum_value;
        let alpha = (dy / dx).max(dx / dy) / (value * ratio);
        let mut beta = sum_value * sum_value * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let node_value = nodes[i1].value;
            sum_value += node_value;
            min_value = min_value.min(node_value);
            max_value = max_value.max(node_value);
            beta = sum_value * sum_value * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum_value -= node_value;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let dice_row = dx < dy;
        place_row(&mut nodes[i0..i1], dice_row, sum_value, value, &mut rest);
        rows.push(Row {
            dice: dice_row,
            len: i1 - i0,
        });
        i0 = i1;
    }

    rows
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio > 1.0 { ratio } else { 1.0 }
}

#[derive(Debug, Clone, Copy)]
pub struct Squarify {
    ratio: f64,
}

impl Squarify {
    pub fn new(ratio: f64) -> Self {
        Self {
            ratio: clamp_ratio(ratio),
        }
    }
}

impl Default for Squarify {
    fn default() -> Self {
        Self::new(PHI)
    }
}

impl Tiler for Squarify {
    fn tile(&mut self, _ctx: TileContext<'_>, children: &mut [HierarchyNode], bounds: Rect) {
        squarify_rows(self.ratio, children, bounds);
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RowPlan {
    ratio: f64,
    names: Vec<String>,
    rows: Vec<Row>,
}

/// Squarify that remembers its row partition per parent.
///
/// The first layout of a parent is a plain squarify. Later layouts of the same
/// children (same names, same order) keep the rows and only re-proportion
/// them, so tiles move as little as possible when weights drift.
#[derive(Debug, Clone)]
pub struct Resquarify {
    ratio: f64,
    plans: BTreeMap<Vec<String>, RowPlan>,
}

impl Resquarify {
    pub fn new(ratio: f64) -> Self {
        Self {
            ratio: clamp_ratio(ratio),
            plans: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    fn rows_for(&self, path: &[String]) -> Option<&[Row]> {
        self.plans.get(path).map(|plan| plan.rows.as_slice())
    }
}

impl Default for Resquarify {
    fn default() -> Self {
        Self::new(PHI)
    }
}

impl Tiler for Resquarify {
    fn tile(&mut self, ctx: TileContext<'_>, children: &mut [HierarchyNode], bounds: Rect) {
        let reusable = self.plans.get(ctx.path).filter(|plan| {
            plan.ratio == self.ratio
                && plan.names.len() == children.len()
                && plan.names.iter().zip(children.iter()).all(|(a, b)| *a == b.name)
        });

        if let Some(plan) = reusable {
            let mut rest = bounds;
            let mut value = sum_values(children);
            let mut start = 0;
            for row in &plan.rows {
                let end = start + row.len;
                let row_nodes = &mut children[start..end];
                let row_value = sum_values(row_nodes);
                place_row(row_nodes, row.dice, row_value, value, &mut rest);
                value -= row_value;
                start = end;
            }
            return;
        }

        let rows = squarify_rows(self.ratio, children, bounds);
        self.plans.insert(
            ctx.path.to_vec(),
            RowPlan {
                ratio: self.ratio,
                names: children.iter().map(|child| child.name.clone()).collect(),
                rows,
            },
        );
    }
}
