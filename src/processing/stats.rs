//! Descriptive statistics over cycle values.
//!
//! Dispersion uses the population form (no Bessel correction) throughout.

/// Arithmetic mean; `NaN` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof = 0); `NaN` for an empty slice
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Standard error of the mean: population standard deviation over √n
pub fn standard_error(values: &[f64]) -> f64 {
    population_std(values) / (values.len() as f64).sqrt()
}

/// Z-score of every value against the slice's own mean and population
/// standard deviation.
///
/// A zero-variance slice scores 0 everywhere.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = population_std(values);
    values
        .iter()
        .map(|v| if sd > 0.0 { (v - m) / sd } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(population_std(&values), 2.0);
        assert!((standard_error(&values) - 2.0 / 8f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_is_nan() {
        assert!(mean(&[]).is_nan());
        assert!(population_std(&[]).is_nan());
        assert!(standard_error(&[]).is_nan());
        assert!(z_scores(&[]).is_empty());
    }

    #[test]
    fn test_single_value_has_zero_error() {
        assert_eq!(standard_error(&[3.5]), 0.0);
    }

    #[test]
    fn test_zero_variance_scores_zero() {
        assert_eq!(z_scores(&[1.5; 6]), vec![0.0; 6]);
    }

    #[test]
    fn test_spike_scores_high() {
        let mut values = vec![10.0; 19];
        values.push(100.0);
        let z = z_scores(&values);
        assert!(z[19] > 3.0);
        assert!(z[..19].iter().all(|s| s.abs() < 1.0));
    }
}
