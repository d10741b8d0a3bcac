use std::f64::consts::TAU;

use super::{CurveFamily, Sample};
use crate::error::CurveError;

/// Upper bound on samples per request.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Radius as a function of angle, chosen once per request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusLaw {
    /// r = cos(kθ)
    Cosine { k: f64 },
    /// r = θ(1 + 2cos θ)
    LimaconTrisectrix,
}

impl RadiusLaw {
    /// Select the radius law of `family` for the frequency ratio `k`.
    pub fn for_family(family: CurveFamily, k: f64) -> Self {
        match family {
            CurveFamily::Rose => RadiusLaw::Cosine { k },
            CurveFamily::RoseEvenAdjusted => {
                // Only an exact even float passes; fractional k keeps its value.
                let k = if k % 2.0 == 0.0 { 2.0 * k } else { k };
                RadiusLaw::Cosine { k }
            }
            // k is accepted but does not shape this family.
            CurveFamily::LimaconTrisectrix => RadiusLaw::LimaconTrisectrix,
        }
    }

    #[inline]
    pub fn radius(&self, angle: f64) -> f64 {
        match *self {
            RadiusLaw::Cosine { k } => (k * angle).cos(),
            RadiusLaw::LimaconTrisectrix => angle * (1.0 + 2.0 * angle.cos()),
        }
    }
}

/// Number of samples in `[0, d·2π)` at the given step.
pub fn sample_count(d: u32, step: f64) -> usize {
    (f64::from(d) * TAU / step).ceil() as usize
}

/// Enumerate polar samples of `family` over `[0, d·2π)`.
///
/// Angles are `i·step`, strictly increasing from zero.
pub fn sample(family: CurveFamily, n: u32, d: u32, step: f64) -> Result<Vec<Sample>, CurveError> {
    if d == 0 {
        return Err(CurveError::InvalidParameter {
            name: "d",
            value: 0.0,
            reason: "denominator must be at least 1",
        });
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(CurveError::InvalidParameter {
            name: "step",
            value: step,
            reason: "step must be finite and positive",
        });
    }
    if f64::from(d) * TAU / step > MAX_SAMPLES as f64 {
        return Err(CurveError::InvalidParameter {
            name: "step",
            value: step,
            reason: "step is too small for the angle domain",
        });
    }

    let k = f64::from(n) / f64::from(d);
    let law = RadiusLaw::for_family(family, k);

    let samples = (0..sample_count(d, step))
        .map(|i| {
            let angle = i as f64 * step;
            Sample {
                radius: law.radius(angle),
                angle,
            }
        })
        .collect();

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_4, PI};

    #[test]
    fn rose_covers_d_full_turns() {
        let samples = sample(CurveFamily::Rose, 3, 26, 0.002).unwrap();
        assert_eq!(samples.len(), (26.0 * TAU / 0.002_f64).ceil() as usize);
        assert_eq!(samples[0].angle, 0.0);
        assert!(samples.last().unwrap().angle < 26.0 * TAU);
        assert!(samples.windows(2).all(|w| w[0].angle < w[1].angle));
    }

    #[test]
    fn rose_is_never_empty_for_valid_input() {
        for (n, d) in [(1, 1), (100, 1), (1, 100), (7, 3)] {
            let samples = sample(CurveFamily::Rose, n, d, 0.002).unwrap();
            assert!(!samples.is_empty());
            assert_eq!(samples.len(), sample_count(d, 0.002));
        }
    }

    #[test]
    fn even_integer_ratio_doubles_frequency() {
        // n = 4, d = 2 gives k = 2, so the adjusted law runs at k' = 4.
        let law = RadiusLaw::for_family(CurveFamily::RoseEvenAdjusted, 4.0 / 2.0);
        assert_eq!(law, RadiusLaw::Cosine { k: 4.0 });
        assert_abs_diff_eq!(law.radius(FRAC_PI_4), -1.0, epsilon = 1e-12);

        let plain = RadiusLaw::for_family(CurveFamily::Rose, 2.0);
        assert_abs_diff_eq!(plain.radius(FRAC_PI_4), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn even_adjusted_samples_near_quarter_pi() {
        let samples = sample(CurveFamily::RoseEvenAdjusted, 4, 2, 0.001).unwrap();
        let nearest = samples
            .iter()
            .min_by(|a, b| {
                (a.angle - FRAC_PI_4)
                    .abs()
                    .total_cmp(&(b.angle - FRAC_PI_4).abs())
            })
            .unwrap();
        assert_abs_diff_eq!(nearest.radius, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn odd_and_fractional_ratios_are_not_adjusted() {
        assert_eq!(
            RadiusLaw::for_family(CurveFamily::RoseEvenAdjusted, 3.0),
            RadiusLaw::Cosine { k: 3.0 }
        );
        assert_eq!(
            RadiusLaw::for_family(CurveFamily::RoseEvenAdjusted, 0.5),
            RadiusLaw::Cosine { k: 0.5 }
        );
    }

    #[test]
    fn limacon_ignores_ratio() {
        let a = sample(CurveFamily::LimaconTrisectrix, 1, 2, 0.002).unwrap();
        let b = sample(CurveFamily::LimaconTrisectrix, 99, 2, 0.002).unwrap();
        assert_eq!(a, b);

        let law = RadiusLaw::for_family(CurveFamily::LimaconTrisectrix, 7.0);
        assert_abs_diff_eq!(law.radius(PI), PI * (1.0 - 2.0), epsilon = 1e-12);
    }

    #[test]
    fn zero_numerator_is_a_degenerate_circle() {
        let samples = sample(CurveFamily::Rose, 0, 1, 0.01).unwrap();
        assert!(samples.iter().all(|s| s.radius == 1.0));
    }

    #[test]
    fn zero_denominator_fails() {
        let err = sample(CurveFamily::Rose, 3, 0, 0.002).unwrap_err();
        assert_eq!(
            err,
            CurveError::InvalidParameter {
                name: "d",
                value: 0.0,
                reason: "denominator must be at least 1",
            }
        );
    }

    #[test]
    fn non_positive_step_fails() {
        for step in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = sample(CurveFamily::Rose, 3, 1, step).unwrap_err();
            assert!(matches!(err, CurveError::InvalidParameter { name: "step", .. }));
        }
    }

    #[test]
    fn tiny_step_fails_instead_of_allocating() {
        for (d, step) in [(1, 1e-300), (1, f64::MIN_POSITIVE), (100, 1e-9)] {
            let err = sample(CurveFamily::Rose, 3, d, step).unwrap_err();
            assert!(matches!(err, CurveError::InvalidParameter { name: "step", .. }));
        }
    }

    #[test]
    fn sample_cap_bounds_the_step() {
        // Just over the cap for d = 1.
        let too_small = TAU / (MAX_SAMPLES as f64 + 10.0);
        assert!(sample(CurveFamily::Rose, 3, 1, too_small).is_err());

        let smallest_default = 100.0 * TAU / CurveFamily::RoseEvenAdjusted.default_step();
        assert!(smallest_default < MAX_SAMPLES as f64);
    }
}
