use std::io::{self, Write};

use super::ProjectedPoint;

/// Ordered points of one sampled curve, in increasing-angle order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveDataset {
    points: Vec<ProjectedPoint>,
}

impl CurveDataset {
    pub fn from_points(points: Vec<ProjectedPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectedPoint> {
        self.points.iter()
    }

    /// Planar view of the dataset.
    pub fn xy(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.x, p.y))
    }

    /// Spatial view, with the angle as the third axis.
    pub fn xyz(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.points.iter().map(|p| (p.x, p.y, p.angle))
    }

    /// Write the dataset as CSV with an `r,a,x,y` header.
    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "r,a,x,y")?;
        for p in &self.points {
            writeln!(out, "{},{},{},{}", p.radius, p.angle, p.x, p.y)?;
        }
        out.flush()
    }
}
