//! Pure numerical primitives shared by the risk engines.
//!
//! Covers:
//! 1. **Piecewise-linear interpolation** with endpoint clamping (no
//!    extrapolation outside the calibration range).
//! 2. **NPV** under a constant discount rate, period 0 undiscounted.
//! 3. **Logistic S-curve** and the normalised emission-reduction trajectory.
//! 4. **Gumbel Type I** quantities: cdf, quantile, method-of-moments fit.
//! 5. **Poisson** strike probabilities.
//! 6. **WACC composition**.

use statrs::distribution::{Discrete, Poisson};
use statrs::statistics::Statistics;

use crate::error::ClimateRiskError;
use crate::types::{Money, Rate};
use crate::ClimateRiskResult;

/// Euler–Mascheroni constant, used by the Gumbel moment fit.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Piecewise-linear interpolation over ascending `(x, y)` calibration points.
/// Outside the calibration range the nearest endpoint is returned.
pub fn interp_linear(points: &[(f64, f64)], x: f64) -> f64 {
    debug_assert!(!points.is_empty());
    if x <= points[0].0 {
        return points[0].1;
    }
    if x >= points[points.len() - 1].0 {
        return points[points.len() - 1].1;
    }
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x >= x0 && x <= x1 {
            let t = (x - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }
    points[points.len() - 1].1
}

/// Net present value of a series of flows. `flows[0]` is undiscounted;
/// `flows[t]` is discounted by `(1 + rate)^t`.
pub fn npv(rate: Rate, flows: &[Money]) -> ClimateRiskResult<Money> {
    if rate <= -1.0 {
        return Err(ClimateRiskError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%.".into(),
        });
    }
    let one_plus_r = 1.0 + rate;
    let mut discount = 1.0;
    let mut result = 0.0;
    for (t, flow) in flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        result += flow / discount;
    }
    Ok(result)
}

/// Standard logistic function.
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Emission-reduction fraction along a logistic S-curve, normalised so that
/// the curve hits `target` exactly at `target_year`.
pub fn reduction_fraction(
    target: f64,
    steepness: f64,
    inflection_year: f64,
    target_year: f64,
    year: f64,
) -> f64 {
    let norm = logistic(steepness * (target_year - inflection_year));
    target * logistic(steepness * (year - inflection_year)) / norm
}

/// Scenario-adjusted discount rate.
pub fn compose_wacc(base: Rate, credit_spread: Rate) -> Rate {
    base + credit_spread
}

/// Annual exceedance probability for a return period in years:
/// `1 - exp(-1/R)`.
pub fn annual_exceedance_probability(return_period_years: f64) -> ClimateRiskResult<f64> {
    if return_period_years <= 0.0 {
        return Err(ClimateRiskError::InvalidInput {
            field: "return_period_years".into(),
            reason: "Return period must be positive.".into(),
        });
    }
    Ok(1.0 - (-1.0 / return_period_years).exp())
}

/// Gumbel Type I cumulative distribution function.
pub fn gumbel_cdf(location: f64, scale: f64, x: f64) -> f64 {
    (-(-(x - location) / scale).exp()).exp()
}

/// Gumbel Type I quantile: the value exceeded with probability `1 - p`.
pub fn gumbel_quantile(location: f64, scale: f64, p: f64) -> ClimateRiskResult<f64> {
    if p <= 0.0 || p >= 1.0 {
        return Err(ClimateRiskError::InvalidInput {
            field: "p".into(),
            reason: "Quantile probability must lie in (0, 1).".into(),
        });
    }
    if scale <= 0.0 {
        return Err(ClimateRiskError::InvalidInput {
            field: "scale".into(),
            reason: "Gumbel scale must be positive.".into(),
        });
    }
    Ok(location - scale * (-p.ln()).ln())
}

/// Fit Gumbel location and scale to annual-maximum samples by the method of
/// moments: `scale = s * sqrt(6) / pi`, `location = mean - gamma * scale`.
pub fn gumbel_fit(samples: &[f64]) -> ClimateRiskResult<(f64, f64)> {
    if samples.len() < 2 {
        return Err(ClimateRiskError::InvalidInput {
            field: "samples".into(),
            reason: "Gumbel fit requires at least two annual maxima.".into(),
        });
    }
    let mean = samples.mean();
    let sd = samples.std_dev();
    if sd <= 0.0 || !sd.is_finite() {
        return Err(ClimateRiskError::InvalidInput {
            field: "samples".into(),
            reason: "Samples must have positive, finite dispersion.".into(),
        });
    }
    let scale = sd * 6.0_f64.sqrt() / std::f64::consts::PI;
    let location = mean - EULER_GAMMA * scale;
    Ok((location, scale))
}

/// Probability of at least one event in a year under a Poisson strike model.
pub fn poisson_p_at_least_one(lambda: f64) -> ClimateRiskResult<f64> {
    if lambda < 0.0 {
        return Err(ClimateRiskError::InvalidInput {
            field: "lambda".into(),
            reason: "Poisson rate cannot be negative.".into(),
        });
    }
    if lambda == 0.0 {
        return Ok(0.0);
    }
    let dist = Poisson::new(lambda).map_err(|e| ClimateRiskError::InvalidInput {
        field: "lambda".into(),
        reason: e.to_string(),
    })?;
    Ok(1.0 - dist.pmf(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POINTS: [(f64, f64); 3] = [(2024.0, 10.0), (2030.0, 40.0), (2050.0, 100.0)];

    #[test]
    fn test_interp_midpoint() {
        // 2027 is halfway between 2024 and 2030: 10 + 0.5*30 = 25
        assert_eq!(interp_linear(&POINTS, 2027.0), 25.0);
    }

    #[test]
    fn test_interp_at_knots() {
        assert_eq!(interp_linear(&POINTS, 2024.0), 10.0);
        assert_eq!(interp_linear(&POINTS, 2030.0), 40.0);
        assert_eq!(interp_linear(&POINTS, 2050.0), 100.0);
    }

    #[test]
    fn test_interp_clamps_outside_range() {
        assert_eq!(interp_linear(&POINTS, 1990.0), 10.0);
        assert_eq!(interp_linear(&POINTS, 2100.0), 100.0);
    }

    #[test]
    fn test_npv_undiscounted_first_period() {
        // 100 + 110/1.1 = 200
        let v = npv(0.10, &[100.0, 110.0]).unwrap();
        assert!((v - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_npv_zero_rate_is_sum() {
        let v = npv(0.0, &[1.0, 2.0, 3.0]).unwrap();
        assert!((v - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_npv_rejects_rate_below_minus_one() {
        assert!(npv(-1.0, &[1.0]).is_err());
    }

    #[test]
    fn test_reduction_curve_hits_target_exactly() {
        let r = reduction_fraction(0.9, 0.14, 2035.0, 2050.0, 2050.0);
        assert!((r - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_reduction_curve_monotone() {
        let mut prev = -1.0;
        for year in 2024..=2050 {
            let r = reduction_fraction(0.7, 0.12, 2038.0, 2050.0, year as f64);
            assert!(r > prev, "curve must rise every year (year {year})");
            assert!((0.0..=0.7).contains(&r));
            prev = r;
        }
    }

    #[test]
    fn test_exceedance_probability_100yr() {
        // 1 - exp(-0.01) = 0.00995...
        let p = annual_exceedance_probability(100.0).unwrap();
        assert!((p - 0.009_950_166).abs() < 1e-9);
    }

    #[test]
    fn test_exceedance_rejects_nonpositive_return_period() {
        assert!(annual_exceedance_probability(0.0).is_err());
    }

    #[test]
    fn test_gumbel_quantile_cdf_round_trip() {
        let q = gumbel_quantile(50.0, 10.0, 0.99).unwrap();
        assert!((gumbel_cdf(50.0, 10.0, q) - 0.99).abs() < 1e-12);
        // q_0.99 = mu - beta*ln(-ln(0.99)) = 50 + 10*4.60014...
        assert!((q - 96.001).abs() < 0.01);
    }

    #[test]
    fn test_gumbel_fit_recovers_parameters() {
        // Deterministic Gringorten plotting-position sample from the true
        // distribution (mu = 50 mm, beta = 10 mm), 40 annual maxima.
        let n = 40usize;
        let samples: Vec<f64> = (1..=n)
            .map(|i| {
                let p = (i as f64 - 0.44) / (n as f64 + 0.12);
                50.0 - 10.0 * (-p.ln()).ln()
            })
            .collect();
        let (mu, beta) = gumbel_fit(&samples).unwrap();
        assert!((mu - 50.0).abs() / 50.0 < 0.10, "location off: {mu}");
        assert!((beta - 10.0).abs() / 10.0 < 0.10, "scale off: {beta}");
    }

    #[test]
    fn test_gumbel_fit_rejects_degenerate_input() {
        assert!(gumbel_fit(&[42.0]).is_err());
        assert!(gumbel_fit(&[42.0, 42.0]).is_err());
    }

    #[test]
    fn test_poisson_at_least_one_matches_closed_form() {
        let p = poisson_p_at_least_one(0.9).unwrap();
        assert!((p - (1.0 - (-0.9_f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_poisson_zero_rate() {
        assert_eq!(poisson_p_at_least_one(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_wacc_composition() {
        assert_eq!(compose_wacc(0.08, 0.015), 0.095);
    }
}
