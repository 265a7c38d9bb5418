//! Helpers for the per-particle statistics series (steps to stick,
//! boundary collisions).

/// Arithmetic mean of a statistics series; 0 for an empty series.
pub fn mean(data: &[u64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|v| *v as f64).sum::<f64>() / data.len() as f64
}

/// Non-overlapping moving average over windows of `period` samples.
///
/// Returns (start index, window mean) pairs; a trailing partial window is
/// dropped. Empty when `period` is 0 or exceeds the series length.
pub fn moving_average(data: &[u64], period: usize) -> Vec<(usize, f64)> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    data.chunks_exact(period)
        .enumerate()
        .map(|(i, window)| (i * period, mean(window)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[4]), 4.0);
        assert_eq!(mean(&[1, 2, 3, 6]), 3.0);
    }

    #[test]
    fn test_moving_average_windows() {
        let data = [2, 4, 6, 8, 10, 12, 99];
        let averaged = moving_average(&data, 2);
        assert_eq!(averaged, vec![(0, 3.0), (2, 7.0), (4, 11.0)]);
    }

    #[test]
    fn test_moving_average_degenerate() {
        assert!(moving_average(&[1, 2, 3], 0).is_empty());
        assert!(moving_average(&[1, 2], 5).is_empty());
    }
}
