use ndarray::Array1;

pub(crate) fn normalize_vector(vec: &Array1<f64>) -> Array1<f64> {
    let norm: f64 = vec.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if norm > 1e-12 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

/// `ln(sum(exp(x)))` computed without overflowing on large magnitudes.
pub(crate) fn log_sum_exp(values: &Array1<f64>) -> f64 {
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}
