use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as two corners, `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Collapses an inverted axis to its midpoint.
    pub fn normalized(self) -> Self {
        let (mut x0, mut x1) = (self.x0, self.x1);
        let (mut y0, mut y1) = (self.y0, self.y1);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        Self { x0, y0, x1, y1 }
    }

    pub fn inset(self, pad: f64) -> Self {
        Self::new(self.x0 + pad, self.y0 + pad, self.x1 - pad, self.y1 - pad).normalized()
    }

    pub fn clamp_to(self, bounds: Rect) -> Self {
        let clamp_x = |v: f64| v.clamp(bounds.x0, bounds.x1);
        let clamp_y = |v: f64| v.clamp(bounds.y0, bounds.y1);
        Self::new(
            clamp_x(self.x0),
            clamp_y(self.y0),
            clamp_x(self.x1),
            clamp_y(self.y1),
        )
    }

    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }
}

/// Space reserved around and between tiles.
///
/// `inner` separates siblings; the four sides inset the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub inner: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn symmetric(inner: f64, vertical: f64, horizontal: f64) -> Self {
        Self {
            inner,
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::symmetric(4.0, 0.0, 0.0)
    }
}

/// A positioned leaf of the treemap.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayout {
    pub name: String,
    pub color: Option<String>,
    /// Layout weight (the mapped size).
    pub weight: f64,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub tiles: Vec<TileLayout>,
}

