//! Moving Average Convergence Divergence (MACD).

use super::ema::ema;
use serde::Serialize;

/// MACD line, signal line and histogram, aligned with the input series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD = EMA(fast) - EMA(slow); signal = EMA(signal_period) of the MACD
/// line; histogram = MACD - signal at every index where both are defined.
pub fn macd(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let n = closes.len();
    let fast = ema(closes, fast_period);
    let slow = ema(closes, slow_period);

    let mut macd_line = vec![None; n];
    for i in 0..n {
        if let (Some(f), Some(s)) = (fast[i], slow[i]) {
            macd_line[i] = Some(f - s);
        }
    }

    // Signal line: EMA over the defined stretch of the MACD line, mapped
    // back onto the original index space.
    let defined_start = macd_line.iter().position(|v| v.is_some());
    let mut signal_line = vec![None; n];
    if let Some(start) = defined_start {
        let defined: Vec<f64> = macd_line[start..].iter().map(|v| v.unwrap()).collect();
        let signal_defined = ema(&defined, signal_period);
        for (offset, value) in signal_defined.into_iter().enumerate() {
            signal_line[start + offset] = value;
        }
    }

    let mut histogram = vec![None; n];
    for i in 0..n {
        if let (Some(m), Some(s)) = (macd_line[i], signal_line[i]) {
            histogram[i] = Some(m - s);
        }
    }

    MacdSeries {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}
