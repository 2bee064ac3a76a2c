//! Statistical primitives for curved grade aggregation.
//!
//! Everything here is a pure function. The normal CDF and inverse CDF are
//! classic rational approximations, accurate far beyond the two decimal
//! places any grade display needs.

/// Standard deviation of the sum of two correlated normal variables.
///
/// sigma = sqrt(s1² + s2² + 2·corr·s1·s2)
///
/// Folding this across a sequence combines an arbitrary number of pairwise
/// correlated deviations one at a time.
pub fn correlated_sigma_sum(sigma1: f64, sigma2: f64, corr: f64) -> f64 {
    (sigma1 * sigma1 + sigma2 * sigma2 + 2.0 * corr * sigma1 * sigma2).sqrt()
}

/// Standard normal cumulative distribution function Φ(z).
///
/// Hastings approximation (A&S 26.2.17), |error| < 7.5e-8.
pub fn normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return 0.5;
    }
    if z >= 8.0 {
        return 1.0;
    }
    if z <= -8.0 {
        return 0.0;
    }

    // Φ(-z) = 1 - Φ(z)
    let (z_abs, negate) = if z < 0.0 { (-z, true) } else { (z, false) };

    const B0: f64 = 0.2316419;
    const B1: f64 = 0.319381530;
    const B2: f64 = -0.356563782;
    const B3: f64 = 1.781477937;
    const B4: f64 = -1.821255978;
    const B5: f64 = 1.330274429;

    let t = 1.0 / (1.0 + B0 * z_abs);
    let poly = t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));
    let pdf = (-0.5 * z_abs * z_abs).exp() / (2.0 * std::f64::consts::PI).sqrt();
    let cdf = 1.0 - pdf * poly;

    if negate {
        1.0 - cdf
    } else {
        cdf
    }
}

/// Standard normal inverse CDF (percent-point function) Φ⁻¹(p).
///
/// Acklam's rational approximation, |relative error| < 1.15e-9 over the
/// open unit interval. Returns ±infinity at p = 0 and p = 1.
pub fn normal_ppf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        // Lower tail
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        // Central region
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        // Upper tail
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

/// Percent-point function of a normal(mu, sigma) truncated to [0, 1].
///
/// Maps a cumulative probability `q` to the score threshold at that
/// percentile of the truncated distribution.
pub fn truncnorm_ppf(q: f64, mu: f64, sigma: f64) -> f64 {
    // The support is exactly [0, 1]; pin the endpoints rather than round
    // tail probabilities through the approximations.
    if q <= 0.0 {
        return 0.0;
    }
    if q >= 1.0 {
        return 1.0;
    }
    let a = (0.0 - mu) / sigma;
    let b = (1.0 - mu) / sigma;
    let cdf_a = normal_cdf(a);
    let cdf_b = normal_cdf(b);
    let p = cdf_a + q * (cdf_b - cdf_a);
    (mu + sigma * normal_ppf(p)).clamp(0.0, 1.0)
}
