//! Curve sampling and projection.
//!
//! A request flows through two pure stages: [`sampler::sample`] enumerates
//! polar samples over `[0, d·2π)` and [`projector::project_all`] attaches
//! Cartesian coordinates, producing a fresh [`CurveDataset`].

mod dataset;
pub mod projector;
pub mod sampler;

pub use dataset::CurveDataset;
pub use projector::{project, project_all};
pub use sampler::{sample, RadiusLaw};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// The supported curve families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CurveFamily {
    /// r = cos(kθ)
    #[default]
    Rose,
    /// r = cos(k'θ) with k' = 2k when k is an even integer
    RoseEvenAdjusted,
    /// r = θ(1 + 2cos θ)
    LimaconTrisectrix,
}

impl CurveFamily {
    pub fn all() -> &'static [CurveFamily] {
        &[
            CurveFamily::Rose,
            CurveFamily::RoseEvenAdjusted,
            CurveFamily::LimaconTrisectrix,
        ]
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let current = all.iter().position(|f| f == self).unwrap_or(0);
        all[(current + 1) % all.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurveFamily::Rose => "rose",
            CurveFamily::RoseEvenAdjusted => "rose-even-adjusted",
            CurveFamily::LimaconTrisectrix => "limacon-trisectrix",
        }
    }

    /// Angular sampling step used when none is configured.
    ///
    /// The even-adjusted rose may run at twice the frequency, so it samples
    /// twice as densely.
    pub fn default_step(&self) -> f64 {
        match self {
            CurveFamily::RoseEvenAdjusted => 0.001,
            CurveFamily::Rose | CurveFamily::LimaconTrisectrix => 0.002,
        }
    }
}

/// Everything needed to sample one curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    pub family: CurveFamily,
    pub n: u32,
    pub d: u32,
    pub step: f64,
}

impl CurveParams {
    /// Parameters using the family's default step.
    pub fn new(family: CurveFamily, n: u32, d: u32) -> Self {
        Self {
            family,
            n,
            d,
            step: family.default_step(),
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Frequency ratio `n / d`, not reduced. `None` when `d` is zero.
    pub fn k(&self) -> Option<f64> {
        (self.d != 0).then(|| f64::from(self.n) / f64::from(self.d))
    }
}

/// One polar sample on a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub radius: f64,
    pub angle: f64,
}

/// A sample extended with its Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub radius: f64,
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

/// Sample and project a curve in one pass.
pub fn generate(params: &CurveParams) -> Result<CurveDataset, CurveError> {
    let samples = sample(params.family, params.n, params.d, params.step)?;
    Ok(project_all(&samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rose_first_point_is_on_positive_x_axis() {
        let dataset = generate(&CurveParams::new(CurveFamily::Rose, 3, 26)).unwrap();
        let first = dataset.points()[0];
        assert_eq!(first.radius, 1.0);
        assert_eq!(first.angle, 0.0);
        assert_eq!(first.x, 1.0);
        assert_eq!(first.y, 0.0);
    }

    #[test]
    fn limacon_starts_at_origin_for_any_ratio() {
        for (n, d) in [(1, 1), (3, 26), (100, 7)] {
            let dataset =
                generate(&CurveParams::new(CurveFamily::LimaconTrisectrix, n, d)).unwrap();
            let first = dataset.points()[0];
            assert_eq!(first.radius, 0.0);
            assert_eq!(first.angle, 0.0);
            assert_eq!(first.x, 0.0);
            assert_eq!(first.y, 0.0);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let params = CurveParams::new(CurveFamily::RoseEvenAdjusted, 5, 3);
        let a = generate(&params).unwrap();
        let b = generate(&params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn projected_points_keep_their_radius() {
        let dataset = generate(&CurveParams::new(CurveFamily::LimaconTrisectrix, 2, 3)).unwrap();
        for p in dataset.iter() {
            let r2 = p.x * p.x + p.y * p.y;
            assert_abs_diff_eq!(r2, p.radius * p.radius, epsilon = 1e-9 * (1.0 + p.radius * p.radius));
        }
    }

    #[test]
    fn zero_denominator_is_reported() {
        let err = generate(&CurveParams::new(CurveFamily::Rose, 3, 0)).unwrap_err();
        assert!(matches!(err, CurveError::InvalidParameter { name: "d", .. }));
    }

    #[test]
    fn k_is_the_unreduced_ratio() {
        assert_eq!(CurveParams::new(CurveFamily::Rose, 4, 2).k(), Some(2.0));
        assert_eq!(CurveParams::new(CurveFamily::Rose, 3, 0).k(), None);
    }

    #[test]
    fn families_cycle() {
        let mut family = CurveFamily::Rose;
        for _ in 0..CurveFamily::all().len() {
            family = family.next();
        }
        assert_eq!(family, CurveFamily::Rose);
        assert_eq!(CurveFamily::Rose.next(), CurveFamily::RoseEvenAdjusted);
    }

    #[test]
    fn default_steps() {
        assert_eq!(CurveFamily::Rose.default_step(), 0.002);
        assert_eq!(CurveFamily::RoseEvenAdjusted.default_step(), 0.001);
        assert_eq!(CurveFamily::LimaconTrisectrix.default_step(), 0.002);
    }
}
