//! Average True Range (ATR).

use crate::types::PricePoint;

/// ATR as the rolling mean of true range over `period` candles.
///
/// TR needs a previous candle, so the first defined ATR sits at index
/// `period`.
pub fn atr(candles: &[PricePoint], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; candles.len()];
    if period == 0 || candles.len() < period + 1 {
        return out;
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|pair| pair[1].true_range(&pair[0]))
        .collect();

    let mut sum: f64 = true_ranges.iter().take(period).sum();
    out[period] = Some(sum / period as f64);
    for i in period..true_ranges.len() {
        sum += true_ranges[i] - true_ranges[i - period];
        out[i + 1] = Some(sum / period as f64);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: usize, spread: f64) -> PricePoint {
        let base = 100.0 + i as f64;
        PricePoint {
            time: i as i64 * 60_000,
            open: base,
            high: base + spread,
            low: base - spread,
            close: base,
            volume: None,
        }
    }

    #[test]
    fn test_atr_constant_range() {
        // Each candle spans 2.0 and steps up 1.0; TR = max(2, |h-pc|, |l-pc|)
        let candles: Vec<PricePoint> = (0..30).map(|i| candle(i, 1.0)).collect();
        let out = atr(&candles, 14);
        let last = out.last().unwrap().unwrap();
        assert!((last - 2.0).abs() < 1e-9, "got {}", last);
    }

    #[test]
    fn test_atr_warm_up() {
        let candles: Vec<PricePoint> = (0..20).map(|i| candle(i, 1.0)).collect();
        let out = atr(&candles, 14);
        for value in out.iter().take(14) {
            assert!(value.is_none());
        }
        assert!(out[14].is_some());
    }

    #[test]
    fn test_atr_positive() {
        let candles: Vec<PricePoint> = (0..40).map(|i| candle(i, 0.5 + (i % 3) as f64)).collect();
        let out = atr(&candles, 14);
        for value in out.iter().flatten() {
            assert!(*value > 0.0);
        }
    }

    #[test]
    fn test_atr_insufficient_data() {
        let candles: Vec<PricePoint> = (0..10).map(|i| candle(i, 1.0)).collect();
        let out = atr(&candles, 14);
        assert!(out.iter().all(|v| v.is_none()));
    }
}
