//! Variance-gain split of a ranked score list.

/// Population variance of `values`; 0 for an empty slice.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

/// Index `i` in `[1, len)` maximizing `var(all) − (var(..i) + var(i..))`.
///
/// Ties keep the first maximum, and a split must strictly improve on zero
/// gain to be chosen, so a flat list returns 1. Lists shorter than two
/// return their own length.
pub fn split(scores: &[f64]) -> usize {
    if scores.len() < 2 {
        return scores.len();
    }
    let total = variance(scores);
    let mut index = 1;
    let mut best = 0.0;
    for i in 1..scores.len() {
        let gain = total - (variance(&scores[..i]) + variance(&scores[i..]));
        if gain > best {
            index = i;
            best = gain;
        }
    }
    index
}
