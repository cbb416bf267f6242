//! Pearson correlation with a two-tailed significance test.
//!
//! The p-value comes from Student's t distribution with `n − 2` degrees of
//! freedom, evaluated through the regularized incomplete beta function:
//! `p = I_x(df/2, 1/2)` with `x = df / (df + t²)`.

use schemars::JsonSchema;
use serde::Serialize;

/// Correlation coefficient and significance for one pair of series.
///
/// `r` and `p` are NaN when the coefficient is undefined: fewer than two
/// observations, or a series without variance. JSON carries NaN as `null`, so
/// the type is serialize-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct Correlation {
    /// Pearson's r, in [-1, 1].
    pub r: f64,
    /// Two-tailed p-value, in [0, 1].
    pub p: f64,
    /// Number of paired observations.
    pub n: usize,
}

impl Correlation {
    /// Perfect self-correlation over `n` observations.
    pub const fn identity(n: usize) -> Self {
        Self { r: 1.0, p: 0.0, n }
    }

    const fn undefined(n: usize) -> Self {
        Self {
            r: f64::NAN,
            p: f64::NAN,
            n,
        }
    }

    /// Whether `r` carries a number.
    pub const fn is_defined(&self) -> bool {
        !self.r.is_nan()
    }
}

/// Pearson correlation of `x` and `y`.
///
/// Series of unequal length are paired up to the shorter one.
#[allow(clippy::cast_precision_loss)]
pub fn pearson(x: &[f64], y: &[f64]) -> Correlation {
    let n = x.len().min(y.len());
    if n < 2 {
        return Correlation::undefined(n);
    }
    let (x, y) = (&x[..n], &y[..n]);

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 || !(sxx * syy).is_finite() {
        return Correlation::undefined(n);
    }

    let mut r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);
    // Exactly linear data can land a few ulps short of ±1.
    if 1.0 - r.abs() <= 4.0 * f64::EPSILON {
        r = r.signum();
    }
    Correlation {
        r,
        p: two_tailed_p(r, n),
        n,
    }
}

#[allow(clippy::cast_precision_loss)]
fn two_tailed_p(r: f64, n: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t2 = r * r * df / (1.0 - r * r);
    regularized_beta(df / (df + t2), df / 2.0, 0.5).clamp(0.0, 1.0)
}

/// Regularized incomplete beta function `I_x(a, b)`.
fn regularized_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln())
        .exp();
    // The continued fraction converges fast only below the mean; use symmetry above it.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

/// Lentz evaluation of the incomplete beta continued fraction.
#[allow(clippy::cast_precision_loss)]
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    const MAX_ITERATIONS: usize = 200;
    const EPSILON: f64 = 3e-16;
    const TINY: f64 = 1e-300;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    h
}

/// Natural log of the gamma function (Lanczos, g = 7), for `x > 0`.
#[allow(clippy::unreadable_literal, clippy::excessive_precision)]
fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];

    if x < 0.5 {
        // Reflection: Γ(x)Γ(1 − x) = π / sin(πx)
        return (std::f64::consts::PI / (std::f64::consts::PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFICIENTS[0];
    for (i, &coefficient) in COEFFICIENTS.iter().enumerate().skip(1) {
        #[allow(clippy::cast_precision_loss)]
        let i = i as f64;
        sum += coefficient / (x + i);
    }
    let t = x + G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn perfect_positive_and_negative() {
        let up = pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]);
        assert!(up.r == 1.0);
        assert!(up.p == 0.0);
        assert_eq!(up.n, 4);

        let down = pearson(&[1.0, 2.0, 3.0, 4.0], &[8.0, 6.0, 4.0, 2.0]);
        assert!(close(down.r, -1.0, 1e-12));
        assert!(down.p == 0.0);
    }

    #[test]
    fn near_unit_coefficient_snaps_to_exact_one() {
        let c = pearson(&[0.1, 0.2, 0.3, 0.7], &[0.3, 0.6, 0.9, 2.1]);
        assert!(c.r == 1.0, "r = {:e}", c.r);
        assert!(c.p == 0.0, "p = {:e}", c.p);

        let down = pearson(&[0.1, 0.2, 0.3, 0.7], &[-0.3, -0.6, -0.9, -2.1]);
        assert!(down.r == -1.0, "r = {:e}", down.r);
        assert!(down.p == 0.0);
    }

    #[test]
    fn undefined_cell_serializes_as_null() {
        let json = serde_json::to_value(pearson(&[1.0, 2.0], &[3.0, 3.0])).unwrap();
        assert!(json["r"].is_null());
        assert!(json["p"].is_null());
        assert_eq!(json["n"], 2);
    }

    #[test]
    fn one_degree_of_freedom_matches_cauchy() {
        // r = 0.5, t = 1/√3; with df = 1, p = 1 − (2/π)·atan(t) = 2/3
        let c = pearson(&[1.0, 2.0, 3.0], &[1.0, 3.0, 2.0]);
        assert!(close(c.r, 0.5, 1e-12));
        assert!(close(c.p, 2.0 / 3.0, 1e-9), "p = {}", c.p);
    }

    #[test]
    fn two_degrees_of_freedom_closed_form() {
        // r = 0.8; with df = 2, p = 1 − t/√(2 + t²) = 1 − r = 0.2
        let c = pearson(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 2.0, 4.0]);
        assert!(close(c.r, 0.8, 1e-12));
        assert!(close(c.p, 0.2, 1e-9), "p = {}", c.p);
    }

    #[test]
    fn critical_t_value_gives_five_percent() {
        // t(0.975, 10) = 2.228138851986
        let t: f64 = 2.228_138_851_986;
        let r = t / (t * t + 10.0).sqrt();
        assert!(close(two_tailed_p(r, 12), 0.05, 1e-8));
    }

    #[test]
    fn symmetric_in_arguments() {
        let x = [3.1, 4.7, 1.2, 9.9, 5.5];
        let y = [2.0, 8.1, 0.3, 7.7, 6.4];
        let xy = pearson(&x, &y);
        let yx = pearson(&y, &x);
        assert!(close(xy.r, yx.r, 1e-15));
        assert!(close(xy.p, yx.p, 1e-15));
        assert!((-1.0..=1.0).contains(&xy.r));
        assert!((0.0..=1.0).contains(&xy.p));
    }

    #[test]
    fn too_few_observations_is_undefined() {
        assert!(!pearson(&[], &[]).is_defined());
        let one = pearson(&[1.0], &[2.0]);
        assert!(one.r.is_nan() && one.p.is_nan());
        assert_eq!(one.n, 1);
    }

    #[test]
    fn two_observations_are_not_significant() {
        let c = pearson(&[1.0, 2.0], &[5.0, 3.0]);
        assert!(close(c.r, -1.0, 1e-12));
        assert!(c.p == 1.0);
    }

    #[test]
    fn zero_variance_is_undefined() {
        let c = pearson(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]);
        assert!(c.r.is_nan());
        assert!(c.p.is_nan());
        assert_eq!(c.n, 3);
    }

    #[test]
    fn unequal_lengths_pair_up_to_shorter() {
        let c = pearson(&[1.0, 2.0, 3.0, 100.0], &[2.0, 4.0, 6.0]);
        assert_eq!(c.n, 3);
        assert!(close(c.r, 1.0, 1e-12));
    }

    #[test]
    fn ln_gamma_known_values() {
        assert!(close(ln_gamma(1.0), 0.0, 1e-12));
        assert!(close(ln_gamma(5.0), 24f64.ln(), 1e-12));
        assert!(close(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), 1e-12));
    }

    #[test]
    fn regularized_beta_bounds_and_symmetry() {
        assert!(regularized_beta(0.0, 2.0, 3.0) == 0.0);
        assert!(regularized_beta(1.0, 2.0, 3.0) == 1.0);
        let lhs = regularized_beta(0.3, 2.0, 3.0);
        let rhs = 1.0 - regularized_beta(0.7, 3.0, 2.0);
        assert!(close(lhs, rhs, 1e-12));
        // I_x(1, 1) = x
        assert!(close(regularized_beta(0.42, 1.0, 1.0), 0.42, 1e-12));
    }
}
