use super::{CurveDataset, ProjectedPoint, Sample};

/// Polar to Cartesian. Negative radii point the opposite way.
#[inline]
pub fn project(sample: Sample) -> ProjectedPoint {
    let (sin, cos) = sample.angle.sin_cos();
    ProjectedPoint {
        radius: sample.radius,
        angle: sample.angle,
        x: sample.radius * cos,
        y: sample.radius * sin,
    }
}

/// Project every sample, keeping generation order.
pub fn project_all(samples: &[Sample]) -> CurveDataset {
    CurveDataset::from_points(samples.iter().copied().map(project).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn projects_onto_axes() {
        let p = project(Sample { radius: 2.0, angle: FRAC_PI_2 });
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0);
        assert_eq!(p.radius, 2.0);
        assert_eq!(p.angle, FRAC_PI_2);
    }

    #[test]
    fn negative_radius_lands_opposite() {
        let p = project(Sample { radius: -1.0, angle: 0.0 });
        assert_eq!(p.x, -1.0);
        assert_eq!(p.y, 0.0);

        let q = project(Sample { radius: -1.0, angle: PI });
        assert_relative_eq!(q.x, 1.0);
    }

    #[test]
    fn non_finite_inputs_propagate() {
        let p = project(Sample { radius: f64::NAN, angle: 1.0 });
        assert!(p.x.is_nan() && p.y.is_nan());

        let q = project(Sample { radius: f64::INFINITY, angle: 0.0 });
        assert_eq!(q.x, f64::INFINITY);
    }

    #[test]
    fn keeps_order() {
        let samples: Vec<Sample> = (0..5)
            .map(|i| Sample { radius: 1.0, angle: i as f64 * 0.1 })
            .collect();
        let dataset = project_all(&samples);
        assert_eq!(dataset.len(), 5);
        for (p, s) in dataset.iter().zip(&samples) {
            assert_eq!(p.angle, s.angle);
        }
    }
}
