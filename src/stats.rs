//! Leaf numeric utilities: EWMA smoothing and least-squares regression.

/// Result of an ordinary least-squares fit over an ordered sequence.
///
/// The sequence index (0..N-1) is the implicit x axis.
#[derive(Debug, Clone, Copy)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    /// Fraction of variance explained by the fitted line, in [0, 1].
    pub r2: f64,
}

/// Smooths a sequence with an exponentially weighted moving average.
///
/// The first output equals the first input (no warm-up bias); each
/// subsequent output is `alpha * raw + (1 - alpha) * previous`.
/// `alpha = 1` reproduces the raw sequence, `alpha = 0` propagates the
/// first value forever.
pub fn ewma(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut smoothed = Vec::with_capacity(values.len());
    for &value in values {
        let next = match smoothed.last() {
            Some(&prev) => alpha * value + (1.0 - alpha) * prev,
            None => value,
        };
        smoothed.push(next);
    }
    smoothed
}

/// Fits a line to `values` over the implicit x axis 0..N-1.
///
/// Degenerate inputs never error: zero or one point yields a zero slope
/// and zero r2 (one point keeps its value as the intercept), and constant
/// input yields zero r2 rather than dividing by a zero variance.
pub fn linear_regression(values: &[f64]) -> Regression {
    let n = values.len();
    if n == 0 {
        return Regression {
            slope: 0.0,
            intercept: 0.0,
            r2: 0.0,
        };
    }
    if n == 1 {
        return Regression {
            slope: 0.0,
            intercept: values[0],
            r2: 0.0,
        };
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = mean(values);

    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        ss_xx += dx * dx;
        ss_xy += dx * (y - mean_y);
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;

    // Total and residual sums of squares for r2. A (near-)constant input
    // has no variance to explain, so r2 is defined as 0 there.
    let ss_tot: f64 = values.iter().map(|&y| (y - mean_y).powi(2)).sum();
    if ss_tot < 1e-12 {
        return Regression {
            slope: 0.0,
            intercept: mean_y,
            r2: 0.0,
        };
    }

    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let fitted = intercept + slope * i as f64;
            (y - fitted).powi(2)
        })
        .sum();

    let r2 = (1.0 - ss_res / ss_tot).clamp(0.0, 1.0);

    Regression {
        slope,
        intercept,
        r2,
    }
}

/// Arithmetic mean. Returns 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Coefficient of variation (population std dev over mean).
///
/// Returns 0 for sequences shorter than 2 values or with a non-positive
/// mean, where the ratio is meaningless.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    if m <= 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|&v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / m
}
