//! Descriptive Statistics Computation

/// Relative precision below which the second central moment counts as zero
const MOMENT_RESOLUTION: f64 = 1e-15;

/// Descriptive statistics for a signal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptiveStats {
    /// Mean value
    pub mean: f64,
    /// Median value
    pub median: f64,
    /// Interquartile range (75th - 25th percentile)
    pub iqr: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Max - min
    pub range: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Median absolute deviation from the median
    pub mad: f64,
    /// Coefficient of variation (0 when mean <= 0)
    pub cv: f64,
    /// Skewness (asymmetry)
    pub skewness: f64,
    /// Excess kurtosis (tailedness)
    pub kurtosis: f64,
}

impl DescriptiveStats {
    /// Compute descriptive statistics from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = mean(values);

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let median = percentile(&sorted, 50.0);
        let iqr = percentile(&sorted, 75.0) - percentile(&sorted, 25.0);

        // Central moments
        let mut m2 = 0.0;
        let mut m3 = 0.0;
        let mut m4 = 0.0;
        for &v in values {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        m2 /= n;
        m3 /= n;
        m4 /= n;

        // Constant input leaves skewness and kurtosis undefined
        let degenerate = min == max || m2 <= (MOMENT_RESOLUTION * mean).powi(2);
        let std_dev = if min == max { 0.0 } else { m2.sqrt() };
        let (skewness, kurtosis) = if degenerate {
            (0.0, 0.0)
        } else {
            (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
        };

        let mut deviations: Vec<f64> = values.iter().map(|v| (v - median).abs()).collect();
        deviations.sort_by(|a, b| a.total_cmp(b));
        let mad = percentile(&deviations, 50.0);

        let cv = if mean > 0.0 { std_dev / mean } else { 0.0 };

        Self {
            mean,
            median,
            iqr,
            min,
            max,
            range: max - min,
            std_dev,
            mad,
            cv,
            skewness,
            kurtosis,
        }
    }
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance, 0 for an empty slice
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Whether every value is identical (true for an empty slice)
pub fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Median of an unsorted slice, 0 for an empty slice
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    percentile(&sorted, 50.0)
}

/// Percentile of an already sorted slice, interpolating linearly between
/// the two closest ranks.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let rank = (q / 100.0).clamp(0.0, 1.0) * (len - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let frac = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}
