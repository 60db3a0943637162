//! Technical indicator pipeline.
//!
//! Each indicator lives in its own module and produces series aligned
//! index-for-index with the price history; warm-up entries are `None`, never
//! a computed value. The pipeline bundles the series, the latest-value
//! summary and the pattern scan for the fusion layer and the API.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod patterns;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use atr::atr;
pub use bollinger::{bollinger, BollingerSeries};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use patterns::{scan as scan_patterns, PatternKind, PatternMatch};
pub use rsi::rsi;
pub use sma::sma;
pub use stochastic::{stochastic, StochasticSeries};

use crate::config::IndicatorPeriods;
use crate::types::PricePoint;
use serde::Serialize;

/// Blend weights for the technical bullish score.
const RSI_BLEND_WEIGHT: f64 = 0.4;
const MACD_BLEND_WEIGHT: f64 = 0.3;
const BOLLINGER_BLEND_WEIGHT: f64 = 0.3;

/// Latest defined value of every indicator, for display and fusion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSummary {
    pub close: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    /// %B of the latest close within the Bollinger band.
    pub percent_b: Option<f64>,
    pub atr: Option<f64>,
    pub stochastic_k: Option<f64>,
    pub stochastic_d: Option<f64>,
}

/// Full output of one pipeline run.
#[derive(Debug, Clone)]
pub struct TechnicalAnalysis {
    pub summary: TechnicalSummary,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: MacdSeries,
    pub bollinger: BollingerSeries,
    pub atr: Vec<Option<f64>>,
    pub stochastic: StochasticSeries,
    pub patterns: Vec<PatternMatch>,
}

impl TechnicalAnalysis {
    /// Blended bullish probability in [0, 1]: RSI level, MACD histogram
    /// sign and Bollinger position. None until all three are defined.
    pub fn bullish_score(&self) -> Option<f64> {
        let rsi = self.summary.rsi?;
        let histogram = self.summary.macd_histogram?;
        let percent_b = self.summary.percent_b?;

        let rsi_component = rsi / 100.0;
        let macd_component = 0.5 + 0.5 * histogram.signum();
        let bollinger_component = (1.0 - percent_b).clamp(0.0, 1.0);

        Some(
            rsi_component * RSI_BLEND_WEIGHT
                + macd_component * MACD_BLEND_WEIGHT
                + bollinger_component * BOLLINGER_BLEND_WEIGHT,
        )
    }

    /// Confidence 0-100: how far the blend components sit from neutral.
    pub fn confidence(&self) -> Option<f64> {
        let rsi = self.summary.rsi?;
        let histogram = self.summary.macd_histogram?;
        let percent_b = self.summary.percent_b?;

        let deviations = [
            (rsi / 100.0 - 0.5).abs(),
            if histogram == 0.0 { 0.0 } else { 0.5 },
            ((1.0 - percent_b).clamp(0.0, 1.0) - 0.5).abs(),
        ];
        let mean = deviations.iter().sum::<f64>() / deviations.len() as f64;
        Some((mean * 200.0).clamp(0.0, 100.0))
    }
}

/// Pipeline configured with the indicator periods.
#[derive(Debug, Clone)]
pub struct TechnicalIndicatorPipeline {
    periods: IndicatorPeriods,
}

impl TechnicalIndicatorPipeline {
    pub fn new(periods: IndicatorPeriods) -> Self {
        Self { periods }
    }

    /// Run every indicator over a price snapshot.
    pub fn analyze(&self, candles: &[PricePoint]) -> TechnicalAnalysis {
        let p = &self.periods;
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let close = closes.last().copied().unwrap_or(0.0);
        let last = closes.len().saturating_sub(1);

        let sma_short = sma(&closes, p.sma_short);
        let sma_long = sma(&closes, p.sma_long);
        let rsi_series = rsi(&closes, p.rsi);
        let macd_series = macd(&closes, p.macd_fast, p.macd_slow, p.macd_signal);
        let bollinger_series = bollinger(&closes, p.bollinger_window, p.bollinger_k);
        let atr_series = atr(candles, p.atr_period);
        let stochastic_series = stochastic(candles, p.stochastic_k, p.stochastic_d);
        let pattern_matches = scan_patterns(&closes);

        let latest = |series: &[Option<f64>]| series.last().copied().flatten();

        let summary = TechnicalSummary {
            close,
            sma_short: latest(&sma_short),
            sma_long: latest(&sma_long),
            rsi: latest(&rsi_series),
            macd: latest(&macd_series.macd),
            macd_signal: latest(&macd_series.signal),
            macd_histogram: latest(&macd_series.histogram),
            percent_b: if closes.is_empty() {
                None
            } else {
                bollinger_series.percent_b(last, close)
            },
            atr: latest(&atr_series),
            stochastic_k: latest(&stochastic_series.k),
            stochastic_d: latest(&stochastic_series.d),
        };

        TechnicalAnalysis {
            summary,
            sma_short,
            sma_long,
            rsi: rsi_series,
            macd: macd_series,
            bollinger: bollinger_series,
            atr: atr_series,
            stochastic: stochastic_series,
            patterns: pattern_matches,
        }
    }
}
