// Local maxima of a 1-D signal

/// Indices (ascending) of samples that are the maximum of their
/// `±min_distance` window, exceed `threshold`, lie at least `min_distance`
/// from either end, and are at least `min_distance` apart. When two peaks
/// are too close the higher one is kept, the earlier one on ties.
pub fn local_maxima(values: &[f64], threshold: f64, min_distance: usize) -> Vec<usize> {
    let d = min_distance.max(1);
    let n = values.len();
    if n <= 2 * d {
        return Vec::new();
    }

    let mut candidates: Vec<usize> = (d..n - d)
        .filter(|&i| values[i] > threshold)
        .filter(|&i| {
            let lo = i.saturating_sub(d);
            let hi = (i + d + 1).min(n);
            values[lo..hi].iter().all(|&v| v <= values[i])
        })
        .collect();

    // highest first, stable on index
    candidates.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut peaks: Vec<usize> = Vec::with_capacity(candidates.len());
    for i in candidates {
        if peaks.iter().all(|&p| p.abs_diff(i) >= d) {
            peaks.push(i);
        }
    }

    peaks.sort_unstable();
    peaks
}
