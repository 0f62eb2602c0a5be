//! Signal-Processing Operators for Tap Interval Series

use crate::statistics::{is_constant, mean, variance};

/// Teager-Kaiser energy operator, averaged over the interior samples.
///
/// Returns 0 for signals shorter than 3 samples.
pub fn teager_kaiser_energy(signal: &[f64]) -> f64 {
    if signal.len() < 3 {
        return 0.0;
    }

    let energy: f64 = signal
        .windows(3)
        .map(|w| w[1] * w[1] - w[0] * w[2])
        .sum();
    energy / (signal.len() - 2) as f64
}

/// Detrended fluctuation proxy.
///
/// Integrates the mean-removed signal, removes the least-squares linear
/// trend over the sample index and returns the population standard
/// deviation of what is left. Returns 0 for signals shorter than 5 samples.
pub fn detrended_fluctuation(signal: &[f64]) -> f64 {
    if signal.len() < 5 {
        return 0.0;
    }

    let m = mean(signal);
    let profile: Vec<f64> = signal
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v - m;
            Some(*acc)
        })
        .collect();

    variance(&linear_detrend(&profile)).sqrt()
}

/// Subtract the least-squares line fitted against the sample index
fn linear_detrend(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    let slope = sxy / sxx;

    values
        .iter()
        .enumerate()
        .map(|(i, &y)| y - (y_mean + slope * (i as f64 - x_mean)))
        .collect()
}

/// Biased sample autocorrelation at `lag`.
///
/// Returns `None` when the lag does not fit in the signal or the signal has
/// no variance, where the ratio is undefined.
pub fn autocorrelation(signal: &[f64], lag: usize) -> Option<f64> {
    if lag >= signal.len() || is_constant(signal) {
        return None;
    }

    let m = mean(signal);
    let c0: f64 = signal.iter().map(|v| (v - m) * (v - m)).sum();
    if c0 <= 0.0 {
        return None;
    }

    let ck: f64 = signal
        .iter()
        .zip(&signal[lag..])
        .map(|(a, b)| (a - m) * (b - m))
        .sum();

    let r = ck / c0;
    r.is_finite().then_some(r)
}

/// Difference between the mean of the first and the last `percent`% of the
/// signal, each window holding at least one sample.
///
/// Returns 0 when the signal is shorter than `min_len`. The two windows may
/// overlap on short signals.
pub fn fatigue(signal: &[f64], percent: usize, min_len: usize) -> f64 {
    let n = signal.len();
    if n < min_len || n == 0 {
        return 0.0;
    }

    let window = (n * percent / 100).max(1).min(n);
    mean(&signal[..window]) - mean(&signal[n - window..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tkeo_short_signal() {
        assert_eq!(teager_kaiser_energy(&[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_tkeo_linear_ramp() {
        // s[i]^2 - s[i-1]*s[i+1] == 1 for a unit-step ramp
        let signal = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((teager_kaiser_energy(&signal) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dfa_short_signal() {
        assert_eq!(detrended_fluctuation(&[1.0, 2.0, 3.0, 4.0]), 0.0);
    }

    #[test]
    fn test_dfa_constant_signal() {
        assert_eq!(detrended_fluctuation(&[3.0; 8]), 0.0);
    }

    #[test]
    fn test_dfa_alternating_signal() {
        let signal = [1.0, 3.0, 1.0, 3.0, 1.0, 3.0];
        let dfa = detrended_fluctuation(&signal);
        assert!(dfa > 0.0);
        assert!(dfa.is_finite());
    }

    #[test]
    fn test_detrend_removes_line() {
        let line: Vec<f64> = (0..10).map(|i| 2.0 * i as f64 + 1.0).collect();
        for r in linear_detrend(&line) {
            assert!(r.abs() < 1e-9);
        }
    }

    #[test]
    fn test_autocorrelation_alternating() {
        let signal = [1.0, -1.0, 1.0, -1.0];
        // c0 = 4, c1 = -3, c2 = 2
        assert!((autocorrelation(&signal, 1).unwrap() + 0.75).abs() < 1e-12);
        assert!((autocorrelation(&signal, 2).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_autocorrelation_degenerate() {
        assert_eq!(autocorrelation(&[2.0, 2.0, 2.0], 1), None);
        assert_eq!(autocorrelation(&[1.0, 2.0], 2), None);
    }

    #[test]
    fn test_fatigue_last_spike() {
        let signal = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 10.0];
        assert!((fatigue(&signal, 10, 10) + 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_fatigue_below_minimum_length() {
        assert_eq!(fatigue(&[1.0, 2.0, 3.0], 25, 4), 0.0);
    }

    #[test]
    fn test_fatigue_window_at_least_one() {
        // n = 4 at 25% -> one sample from each end
        assert!((fatigue(&[4.0, 1.0, 1.0, 2.0], 25, 4) - 2.0).abs() < 1e-12);
        // n = 3 at 50% -> floor(1.5) = 1
        assert!((fatigue(&[3.0, 0.0, 1.0], 50, 2) - 2.0).abs() < 1e-12);
    }
}
