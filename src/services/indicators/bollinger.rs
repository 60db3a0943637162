//! Bollinger Bands.

use super::sma::sma;
use serde::Serialize;

/// Middle/upper/lower bands aligned with the input series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerSeries {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BollingerSeries {
    /// %B at an index: position of `price` within the band, 0 at the lower
    /// band, 1 at the upper. A collapsed band reads as the midpoint.
    pub fn percent_b(&self, index: usize, price: f64) -> Option<f64> {
        let upper = self.upper.get(index).copied().flatten()?;
        let lower = self.lower.get(index).copied().flatten()?;
        let width = upper - lower;
        if width > 0.0 {
            Some((price - lower) / width)
        } else {
            Some(0.5)
        }
    }
}

/// Bollinger bands: SMA(window) +/- k * rolling population stddev(window).
pub fn bollinger(closes: &[f64], window: usize, k: f64) -> BollingerSeries {
    let n = closes.len();
    let middle = sma(closes, window);
    let mut upper = vec![None; n];
    let mut lower = vec![None; n];

    for i in 0..n {
        if let Some(mean) = middle[i] {
            let slice = &closes[i + 1 - window..=i];
            let variance =
                slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / window as f64;
            let std_dev = variance.sqrt();
            upper[i] = Some(mean + k * std_dev);
            lower[i] = Some(mean - k * std_dev);
        }
    }

    BollingerSeries {
        middle,
        upper,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_flat_series_collapses() {
        let closes = vec![10.0; 30];
        let series = bollinger(&closes, 20, 2.0);
        let i = 25;
        assert_eq!(series.middle[i], Some(10.0));
        assert_eq!(series.upper[i], Some(10.0));
        assert_eq!(series.lower[i], Some(10.0));
        // Collapsed band reads as midpoint
        assert_eq!(series.percent_b(i, 10.0), Some(0.5));
    }

    #[test]
    fn test_bollinger_bands_bracket_middle() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 3.0)
            .collect();
        let series = bollinger(&closes, 20, 2.0);
        for i in 19..closes.len() {
            let (m, u, l) = (
                series.middle[i].unwrap(),
                series.upper[i].unwrap(),
                series.lower[i].unwrap(),
            );
            assert!(u >= m && m >= l);
        }
    }

    #[test]
    fn test_percent_b_positioning() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + (i % 5) as f64).collect();
        let series = bollinger(&closes, 20, 2.0);
        let i = 24;
        let upper = series.upper[i].unwrap();
        let lower = series.lower[i].unwrap();
        assert_eq!(series.percent_b(i, upper), Some(1.0));
        assert_eq!(series.percent_b(i, lower), Some(0.0));
    }

    #[test]
    fn test_bollinger_warm_up() {
        let closes = vec![1.0; 10];
        let series = bollinger(&closes, 20, 2.0);
        assert!(series.upper.iter().all(|v| v.is_none()));
        assert!(series.percent_b(5, 1.0).is_none());
    }
}
