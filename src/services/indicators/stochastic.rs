//! Stochastic Oscillator.

use crate::types::PricePoint;

/// %K and %D series aligned with the input.
#[derive(Debug, Clone)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// %K = (close - lowest_low) / (highest_high - lowest_low) * 100 over a
/// trailing window; %D = SMA(%K, d_period). A flat window reads as 50.
pub fn stochastic(candles: &[PricePoint], k_period: usize, d_period: usize) -> StochasticSeries {
    let n = candles.len();
    let mut k = vec![None; n];
    if k_period == 0 || n < k_period {
        return StochasticSeries { k, d: vec![None; n] };
    }

    for i in (k_period - 1)..n {
        let window = &candles[i + 1 - k_period..=i];
        let lowest_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let highest_high = window
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = highest_high - lowest_low;
        k[i] = Some(if range > 0.0 {
            (candles[i].close - lowest_low) / range * 100.0
        } else {
            50.0
        });
    }

    // %D: SMA of %K over the defined stretch, mapped back to input indices.
    let mut d = vec![None; n];
    let start = k_period - 1;
    let defined: Vec<f64> = k[start..].iter().map(|v| v.unwrap()).collect();
    if defined.len() >= d_period {
        let mut sum: f64 = defined.iter().take(d_period).sum();
        d[start + d_period - 1] = Some(sum / d_period as f64);
        for i in d_period..defined.len() {
            sum += defined[i] - defined[i - d_period];
            d[start + i] = Some(sum / d_period as f64);
        }
    }

    StochasticSeries { k, d }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uptrend(count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 1.5;
                PricePoint {
                    time: i as i64 * 60_000,
                    open: base,
                    high: base + 2.0,
                    low: base - 1.0,
                    close: base + 1.0,
                    volume: Some(1000.0),
                }
            })
            .collect()
    }

    #[test]
    fn test_stochastic_range() {
        let candles = uptrend(40);
        let series = stochastic(&candles, 14, 3);
        for value in series.k.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
        for value in series.d.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
    }

    #[test]
    fn test_stochastic_uptrend_high_k() {
        let candles = uptrend(40);
        let series = stochastic(&candles, 14, 3);
        let k = series.k.last().unwrap().unwrap();
        assert!(k > 50.0, "uptrend %K should be high, got {}", k);
    }

    #[test]
    fn test_stochastic_flat_window_reads_50() {
        let candles: Vec<PricePoint> = (0..20)
            .map(|i| PricePoint {
                time: i as i64,
                open: 10.0,
                high: 10.0,
                low: 10.0,
                close: 10.0,
                volume: None,
            })
            .collect();
        let series = stochastic(&candles, 14, 3);
        assert_eq!(series.k[19], Some(50.0));
    }

    #[test]
    fn test_stochastic_warm_up_alignment() {
        let candles = uptrend(20);
        let series = stochastic(&candles, 14, 3);
        assert!(series.k[12].is_none());
        assert!(series.k[13].is_some());
        assert!(series.d[14].is_none());
        assert!(series.d[15].is_some());
    }
}
