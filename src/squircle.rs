//! Smooth-cornered rectangle outlines.
//!
//! Each corner is a circular arc flanked by two cubic transitions. With
//! `smoothing = 0` the corner is a plain quarter circle; as smoothing grows the
//! arc shrinks and the transitions take over, approaching a superellipse. The
//! arc itself is emitted as a cubic approximation so the outline only uses
//! move, line, cubic and close commands.

use std::f64::consts::SQRT_2;
use std::fmt;

use crate::render::fmt_num;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquircleParams {
    pub corner_radius: f64,
    /// In `[0, 1]`; values outside are clamped.
    pub corner_smoothing: f64,
    /// Keep the requested smoothing even when the corner runs out of room,
    /// squeezing the transition curves instead.
    pub preserve_smoothing: bool,
}

impl Default for SquircleParams {
    fn default() -> Self {
        Self {
            corner_radius: crate::theme::CORNER_RADIUS,
            corner_smoothing: crate::theme::CORNER_SMOOTHING,
            preserve_smoothing: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Absolute move.
    MoveTo(f64, f64),
    /// Absolute line.
    LineTo(f64, f64),
    /// Relative cubic: two control points and the end point.
    CurveBy([(f64, f64); 3]),
    Close,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SquirclePath {
    pub commands: Vec<PathCommand>,
}

impl SquirclePath {
    /// Absolute outline points, sampling every cubic `steps` times.
    pub fn flatten(&self, steps: usize) -> Vec<(f64, f64)> {
        let steps = steps.max(1);
        let mut points = Vec::new();
        let mut cursor = (0.0, 0.0);
        let mut start = cursor;
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(x, y) => {
                    cursor = (x, y);
                    start = cursor;
                    points.push(cursor);
                }
                PathCommand::LineTo(x, y) => {
                    cursor = (x, y);
                    points.push(cursor);
                }
                PathCommand::CurveBy([c1, c2, end]) => {
                    let p0 = cursor;
                    let p1 = (p0.0 + c1.0, p0.1 + c1.1);
                    let p2 = (p0.0 + c2.0, p0.1 + c2.1);
                    let p3 = (p0.0 + end.0, p0.1 + end.1);
                    for step in 1..=steps {
                        let t = step as f64 / steps as f64;
                        let mt = 1.0 - t;
                        let a = mt * mt * mt;
                        let b = 3.0 * mt * mt * t;
                        let c = 3.0 * mt * t * t;
                        let d = t * t * t;
                        points.push((
                            a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
                            a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
                        ));
                    }
                    cursor = p3;
                }
                PathCommand::Close => {
                    cursor = start;
                    points.push(cursor);
                }
            }
        }
        points
    }

    /// Shoelace area of the flattened outline.
    pub fn approximate_area(&self, steps: usize) -> f64 {
        let points = self.flatten(steps);
        if points.len() < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            twice += a.0 * b.1 - b.0 * a.1;
        }
        (twice / 2.0).abs()
    }
}

impl fmt::Display for SquirclePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, command) in self.commands.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            match *command {
                PathCommand::MoveTo(x, y) => write!(f, "M {} {}", fmt_num(x), fmt_num(y))?,
                PathCommand::LineTo(x, y) => write!(f, "L {} {}", fmt_num(x), fmt_num(y))?,
                PathCommand::CurveBy([c1, c2, end]) => write!(
                    f,
                    "c {} {} {} {} {} {}",
                    fmt_num(c1.0),
                    fmt_num(c1.1),
                    fmt_num(c2.0),
                    fmt_num(c2.1),
                    fmt_num(end.0),
                    fmt_num(end.1)
                )?,
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct CornerParams {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    p: f64,
    radius: f64,
    arc_section_length: f64,
    /// Sweep of the circular part, in degrees.
    arc_measure: f64,
}

fn corner_params(radius: f64, smoothing: f64, preserve: bool, budget: f64) -> CornerParams {
    let mut smoothing = smoothing;
    let mut p = (1.0 + smoothing) * radius;
    if !preserve {
        let max_smoothing = budget / radius - 1.0;
        smoothing = smoothing.min(max_smoothing).max(0.0);
        p = p.min(budget);
    }

    let arc_measure = 90.0 * (1.0 - smoothing);
    let arc_section_length = (arc_measure / 2.0).to_radians().sin() * radius * SQRT_2;
    let angle_alpha = (90.0 - arc_measure) / 2.0;
    let p3_to_p4 = radius * (angle_alpha / 2.0).to_radians().tan();
    let angle_beta = (45.0 * smoothing).to_radians();
    let c = p3_to_p4 * angle_beta.cos();
    let d = c * angle_beta.tan();

    let mut b = (p - arc_section_length - c - d) / 3.0;
    let mut a = 2.0 * b;
    if preserve && p > budget {
        let p1_to_p3_max = budget - d - arc_section_length - c;
        let min_a = p1_to_p3_max / 6.0;
        let max_b = p1_to_p3_max - min_a;
        b = b.min(max_b);
        a = p1_to_p3_max - b;
        p = p.min(budget);
    }

    CornerParams {
        a,
        b,
        c,
        d,
        p,
        radius,
        arc_section_length,
        arc_measure,
    }
}

/// The top-right corner in its own frame, travelling clockwise: three relative
/// cubics (transition in, arc, transition out).
fn top_right_corner(params: &CornerParams) -> [[(f64, f64); 3]; 3] {
    let CornerParams { a, b, c, d, .. } = *params;
    let l = params.arc_section_length;

    let theta = params.arc_measure.to_radians();
    let handle = 4.0 / 3.0 * (theta / 4.0).tan() * params.radius;
    let chord = std::f64::consts::FRAC_PI_4;
    let (start, end) = (chord - theta / 2.0, chord + theta / 2.0);
    let arc = [
        (handle * start.cos(), handle * start.sin()),
        (l - handle * end.cos(), l - handle * end.sin()),
        (l, l),
    ];

    [
        [(a, 0.0), (a + b, 0.0), (a + b + c, d)],
        arc,
        [(d, c), (d, b + c), (d, a + b + c)],
    ]
}

/// Quarter turns clockwise on screen (y down).
fn rotate(point: (f64, f64), quarter_turns: usize) -> (f64, f64) {
    match quarter_turns % 4 {
        0 => point,
        1 => (-point.1, point.0),
        2 => (-point.0, -point.1),
        _ => (point.1, -point.0),
    }
}

/// Outline of a `width` x `height` rectangle with smoothed corners, starting
/// at the top edge and running clockwise.
pub fn squircle_path(width: f64, height: f64, params: &SquircleParams) -> SquirclePath {
    let width = if width > 0.0 { width } else { 0.0 };
    let height = if height > 0.0 { height } else { 0.0 };
    let budget = width.min(height) / 2.0;
    let radius = params.corner_radius.max(0.0).min(budget);

    if !(radius > 0.0) {
        return SquirclePath {
            commands: vec![
                PathCommand::MoveTo(width, 0.0),
                PathCommand::LineTo(width, height),
                PathCommand::LineTo(0.0, height),
                PathCommand::LineTo(0.0, 0.0),
                PathCommand::Close,
            ],
        };
    }

    let smoothing = params.corner_smoothing.clamp(0.0, 1.0);
    let corner = corner_params(radius, smoothing, params.preserve_smoothing, budget);
    let segments = top_right_corner(&corner);
    let p = corner.p;

    let edge_ends = [
        (width, height - p),
        (p, height),
        (0.0, p),
    ];

    let mut commands = Vec::with_capacity(18);
    commands.push(PathCommand::MoveTo(width - p, 0.0));
    for turn in 0..4 {
        for segment in &segments {
            commands.push(PathCommand::CurveBy([
                rotate(segment[0], turn),
                rotate(segment[1], turn),
                rotate(segment[2], turn),
            ]));
        }
        if let Some(&(x, y)) = edge_ends.get(turn) {
            commands.push(PathCommand::LineTo(x, y));
        }
    }
    commands.push(PathCommand::Close);
    SquirclePath { commands }
}
