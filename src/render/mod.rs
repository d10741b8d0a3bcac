//! Point cloud rendering.
//!
//! The dataset is mapped to plane coordinates (`x, y` in 2D, an orthographic
//! view of `x, y, angle` in 3D), scaled into a braille dot grid and written
//! to a ratatui buffer.

pub mod braille;

pub use braille::BrailleCanvas;

use clap::ValueEnum;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::color::RgbColor;
use crate::curve::CurveDataset;

/// Share of the distance to the background color applied to the farthest points.
const DEPTH_FADE: f32 = 0.75;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, ValueEnum, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "2d")]
    #[value(name = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    #[value(name = "3d")]
    ThreeD,
}

impl ViewMode {
    pub fn toggle(&self) -> Self {
        match self {
            ViewMode::TwoD => ViewMode::ThreeD,
            ViewMode::ThreeD => ViewMode::TwoD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::TwoD => "2d",
            ViewMode::ThreeD => "3d",
        }
    }
}

/// How points are drawn, independent of which points are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub color: RgbColor,
    pub background_color: RgbColor,
    /// Dot diameter, 1.0 to 5.0.
    pub point_size: f32,
    /// Requested plot width in braille dots.
    pub width: u16,
    /// Requested plot height in braille dots.
    pub height: u16,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            color: RgbColor::BLACK,
            background_color: RgbColor::WHITE,
            point_size: 1.0,
            width: 1000,
            height: 1000,
        }
    }
}

impl RenderStyle {
    /// Dot diameter as a whole number of dots, at least one.
    pub fn dot_diameter(&self) -> usize {
        (self.point_size.round() as usize).max(1)
    }
}

/// Orthographic camera for the 3D view, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub yaw: f64,
    pub pitch: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { yaw: 0.8, pitch: 0.5 }
    }
}

impl Camera {
    /// Rotate the camera; pitch stays within straight up and straight down.
    pub fn rotate(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw = (self.yaw + d_yaw).rem_euclid(std::f64::consts::TAU);
        self.pitch = (self.pitch + d_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

/// A point on the viewing plane. `depth` is 0 for the nearest point and 1 for the farthest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub u: f64,
    pub v: f64,
    pub depth: f32,
}

/// Map every dataset point onto the viewing plane.
pub fn plot_points(dataset: &CurveDataset, mode: ViewMode, camera: &Camera) -> Vec<PlotPoint> {
    match mode {
        ViewMode::TwoD => dataset
            .xy()
            .map(|(x, y)| PlotPoint { u: x, v: y, depth: 0.0 })
            .collect(),
        ViewMode::ThreeD => plot_points_3d(dataset, camera),
    }
}

fn plot_points_3d(dataset: &CurveDataset, camera: &Camera) -> Vec<PlotPoint> {
    let nx = AxisNorm::fit(dataset.iter().map(|p| p.x));
    let ny = AxisNorm::fit(dataset.iter().map(|p| p.y));
    let nz = AxisNorm::fit(dataset.iter().map(|p| p.angle));

    let (sin_yaw, cos_yaw) = camera.yaw.sin_cos();
    let (sin_pitch, cos_pitch) = camera.pitch.sin_cos();

    // (u, v, far) with far growing away from the viewer
    let projected: Vec<(f64, f64, f64)> = dataset
        .xyz()
        .map(|(x, y, z)| {
            let (x, y, z) = (nx.apply(x), ny.apply(y), nz.apply(z));
            let x1 = x * cos_yaw - y * sin_yaw;
            let y1 = x * sin_yaw + y * cos_yaw;
            let v = z * cos_pitch + y1 * sin_pitch;
            let far = y1 * cos_pitch - z * sin_pitch;
            (x1, v, far)
        })
        .collect();

    let depth = AxisNorm::fit(projected.iter().map(|p| p.2));
    projected
        .into_iter()
        .map(|(u, v, far)| PlotPoint {
            u,
            v,
            depth: ((depth.apply(far) + 1.0) / 2.0) as f32,
        })
        .collect()
}

/// Affine map of one axis' finite range onto [-1, 1].
#[derive(Debug, Clone, Copy)]
struct AxisNorm {
    mid: f64,
    half: f64,
}

impl AxisNorm {
    fn fit(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = finite_range(values).unwrap_or((0.0, 0.0));
        Self {
            mid: (min + max) / 2.0,
            half: (max - min) / 2.0,
        }
    }

    #[inline]
    fn apply(&self, value: f64) -> f64 {
        if !value.is_finite() {
            f64::NAN
        } else if self.half > 0.0 {
            (value - self.mid) / self.half
        } else {
            0.0
        }
    }
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// The centered sub-area used for the plot, in cells.
pub fn plot_area(area: Rect, style: &RenderStyle) -> Rect {
    let want_w = style.width.div_ceil(2);
    let want_h = style.height.div_ceil(4);
    let w = want_w.min(area.width);
    let h = want_h.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Render `dataset` into `area` of `buf`.
pub fn render_dataset(
    buf: &mut Buffer,
    area: Rect,
    dataset: &CurveDataset,
    mode: ViewMode,
    camera: &Camera,
    style: &RenderStyle,
) {
    let area = plot_area(area, style);
    if area.width == 0 || area.height == 0 {
        return;
    }

    let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);
    let points = plot_points(dataset, mode, camera);
    let diameter = canvas.grid_w.min(canvas.grid_h).min(style.dot_diameter()).max(1);

    if let Some(fit) = GridFit::new(&points, canvas.grid_w, canvas.grid_h, diameter) {
        for p in &points {
            if let Some((gx, gy)) = fit.apply(p) {
                canvas.stamp(gx, gy, diameter, p.depth);
            }
        }
    }

    let fade = match mode {
        ViewMode::TwoD => 0.0,
        ViewMode::ThreeD => DEPTH_FADE,
    };
    canvas.render(buf, area, style.background_color, |depth| {
        style.color.blend(style.background_color, depth * fade)
    });
}

/// Uniform scale from plane coordinates to dot coordinates, y pointing down.
#[derive(Debug, Clone, Copy)]
struct GridFit {
    center_u: f64,
    center_v: f64,
    scale: f64,
    grid_cx: f64,
    grid_cy: f64,
}

impl GridFit {
    fn new(points: &[PlotPoint], grid_w: usize, grid_h: usize, diameter: usize) -> Option<Self> {
        let (min_u, max_u) = finite_range(points.iter().map(|p| p.u))?;
        let (min_v, max_v) = finite_range(points.iter().map(|p| p.v))?;

        let usable_w = grid_w.saturating_sub(diameter) as f64;
        let usable_h = grid_h.saturating_sub(diameter) as f64;
        let span_u = max_u - min_u;
        let span_v = max_v - min_v;

        let scale = match (span_u > 0.0, span_v > 0.0) {
            (true, true) => (usable_w / span_u).min(usable_h / span_v),
            (true, false) => usable_w / span_u,
            (false, true) => usable_h / span_v,
            (false, false) => 0.0,
        };

        Some(Self {
            center_u: (min_u + max_u) / 2.0,
            center_v: (min_v + max_v) / 2.0,
            scale,
            grid_cx: (grid_w as f64 - 1.0) / 2.0,
            grid_cy: (grid_h as f64 - 1.0) / 2.0,
        })
    }

    fn apply(&self, p: &PlotPoint) -> Option<(isize, isize)> {
        if !p.u.is_finite() || !p.v.is_finite() {
            return None;
        }
        let gx = self.grid_cx + (p.u - self.center_u) * self.scale;
        let gy = self.grid_cy - (p.v - self.center_v) * self.scale;
        Some((gx.round() as isize, gy.round() as isize))
    }
}
