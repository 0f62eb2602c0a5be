//! Tap Position Geometry

use crate::statistics::{is_constant, mean, median, variance};
use serde::{Deserialize, Serialize};

/// Screen coordinate of a single tap
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TapPosition {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl TapPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Split positions into parallel x and y coordinate arrays
pub fn coordinates(positions: &[TapPosition]) -> (Vec<f64>, Vec<f64>) {
    positions.iter().map(|p| (p.x, p.y)).unzip()
}

/// Euclidean distance of every tap from the median tap position
pub fn drift(positions: &[TapPosition]) -> Vec<f64> {
    let (xs, ys) = coordinates(positions);
    let cx = median(&xs);
    let cy = median(&ys);

    xs.iter()
        .zip(&ys)
        .map(|(x, y)| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt())
        .collect()
}

/// Pearson correlation of two equally long coordinate arrays.
///
/// Returns `None` when either axis has no variance or the coefficient does
/// not come out finite.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if is_constant(xs) || is_constant(ys) || variance(xs) <= 0.0 || variance(ys) <= 0.0 {
        return None;
    }

    let mx = mean(xs);
    let my = mean(ys);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    r.is_finite().then_some(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drift_from_median() {
        let positions = [
            TapPosition::new(0.0, 0.0),
            TapPosition::new(3.0, 4.0),
            TapPosition::new(6.0, 8.0),
        ];
        // Median is (3, 4)
        let d = drift(&positions);
        assert!((d[0] - 5.0).abs() < 1e-12);
        assert!(d[1].abs() < 1e-12);
        assert!((d[2] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);

        let inverse = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &inverse).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_zero_variance() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[5.0], &[3.0]), None);
    }

    #[test]
    fn test_missing_coordinate_defaults_to_zero() {
        let pos: TapPosition = serde_json::from_str(r#"{"x": 12.5}"#).unwrap();
        assert_eq!(pos, TapPosition::new(12.5, 0.0));
    }
}
