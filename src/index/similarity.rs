//! Vector math over raw frequency columns.

/// Divide every entry by the vector's sum.
/// An all-zero vector stays all zero.
pub fn l1_normalize(vec: &[f64]) -> Vec<f64> {
    let sum: f64 = vec.iter().sum();
    if sum == 0.0 {
        return vec![0.0; vec.len()];
    }
    vec.iter().map(|v| v / sum).collect()
}

/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
/// A zero-norm side gives 0 instead of NaN.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
