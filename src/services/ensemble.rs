//! Multi-model prediction ensemble.
//!
//! Six independent estimators each derive one feature from the price history
//! and call a direction with a confidence and target price. The predictor
//! blends them into a weighted consensus. Confidence jitter comes from an
//! injected seedable generator so identical inputs and seeds always produce
//! identical output.

use crate::types::{EnsembleConsensus, ModelPrediction, PredictionDirection, PricePoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

// =============================================================================
// Constants
// =============================================================================

/// Minimum history before the ensemble computes anything.
pub const MIN_HISTORY: usize = 30;

/// Dead zone for calling a direction from a fractional-return feature.
const DIRECTION_DEAD_ZONE: f64 = 0.002;

/// Confidence bounds for a single estimator.
const MIN_CONFIDENCE: f64 = 10.0;
const MAX_CONFIDENCE: f64 = 95.0;

/// Jitter applied to each estimator confidence, in points.
const CONFIDENCE_JITTER: f64 = 2.0;

/// Target price moves are capped at this fraction of the close.
const MAX_TARGET_MOVE: f64 = 0.10;

// =============================================================================
// Estimators
// =============================================================================

/// A single directional estimator over the price history.
pub trait Estimator: Send + Sync {
    /// Stable estimator name used in output and weight tables.
    fn name(&self) -> &'static str;

    /// Signed fractional-return feature; positive is bullish.
    /// None when the history cannot support the feature.
    fn feature(&self, candles: &[PricePoint]) -> Option<f64>;
}

/// All estimators in weight-table order.
pub fn all_models() -> Vec<Box<dyn Estimator>> {
    vec![
        Box::new(Momentum),
        Box::new(VolatilityTrend),
        Box::new(SmaCross),
        Box::new(MeanReturn),
        Box::new(RangePosition),
        Box::new(TrendAlignment),
    ]
}

fn closes(candles: &[PricePoint]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

fn window_return(closes: &[f64], window: usize) -> Option<f64> {
    if closes.len() <= window {
        return None;
    }
    let start = closes[closes.len() - 1 - window];
    if start == 0.0 {
        return None;
    }
    Some((closes[closes.len() - 1] - start) / start)
}

/// Blended short- and long-horizon momentum.
struct Momentum;

impl Estimator for Momentum {
    fn name(&self) -> &'static str {
        "momentum"
    }

    fn feature(&self, candles: &[PricePoint]) -> Option<f64> {
        let closes = closes(candles);
        let short = window_return(&closes, 5)?;
        let long = window_return(&closes, 20)?;
        // Long-horizon drift rescaled to the short window before blending
        Some(0.6 * short + 0.4 * (long / 4.0))
    }
}

/// Trend scaled down by recent volatility.
struct VolatilityTrend;

impl Estimator for VolatilityTrend {
    fn name(&self) -> &'static str {
        "volatility_trend"
    }

    fn feature(&self, candles: &[PricePoint]) -> Option<f64> {
        let closes = closes(candles);
        let trend = window_return(&closes, 20)?;
        let tail = &closes[closes.len() - 21..];
        let returns: Vec<f64> = tail
            .windows(2)
            .filter(|p| p[0] != 0.0)
            .map(|p| (p[1] - p[0]) / p[0])
            .collect();
        if returns.is_empty() {
            return None;
        }
        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let variance =
            returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
        let vol = variance.sqrt();
        if vol < 1e-12 {
            // Flat series carries no volatility-adjusted information
            return Some(0.0);
        }
        // Sharpe-like ratio, rescaled into fractional-return territory
        Some((trend / (vol * (20.0f64).sqrt())).clamp(-3.0, 3.0) * 0.01)
    }
}

/// Fast SMA position against the slow SMA.
struct SmaCross;

impl Estimator for SmaCross {
    fn name(&self) -> &'static str {
        "sma_cross"
    }

    fn feature(&self, candles: &[PricePoint]) -> Option<f64> {
        let closes = closes(candles);
        if closes.len() < 30 {
            return None;
        }
        let fast: f64 = closes[closes.len() - 10..].iter().sum::<f64>() / 10.0;
        let slow: f64 = closes[closes.len() - 30..].iter().sum::<f64>() / 30.0;
        if slow == 0.0 {
            return None;
        }
        Some((fast - slow) / slow)
    }
}

/// Average of the most recent single-bar returns.
struct MeanReturn;

impl Estimator for MeanReturn {
    fn name(&self) -> &'static str {
        "mean_return"
    }

    fn feature(&self, candles: &[PricePoint]) -> Option<f64> {
        let closes = closes(candles);
        if closes.len() < 11 {
            return None;
        }
        let tail = &closes[closes.len() - 11..];
        let returns: Vec<f64> = tail
            .windows(2)
            .filter(|p| p[0] != 0.0)
            .map(|p| (p[1] - p[0]) / p[0])
            .collect();
        if returns.is_empty() {
            return None;
        }
        // Scale the per-bar mean up to a short-horizon move
        Some(returns.iter().sum::<f64>() / returns.len() as f64 * 5.0)
    }
}

/// Position of the close within the recent high/low range.
///
/// Reads mean-reverting: a close pinned to the range low is treated as a
/// buying opportunity, pinned to the high as exhaustion.
struct RangePosition;

impl Estimator for RangePosition {
    fn name(&self) -> &'static str {
        "range_position"
    }

    fn feature(&self, candles: &[PricePoint]) -> Option<f64> {
        if candles.len() < 20 {
            return None;
        }
        let tail = &candles[candles.len() - 20..];
        let high = tail.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let low = tail.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let range = high - low;
        if range <= 0.0 {
            return Some(0.0);
        }
        let position = (tail.last()?.close - low) / range;
        // 0.5 at mid-range; scaled into fractional-return territory
        Some((0.5 - position) * 0.02)
    }
}

/// Agreement between the short and long horizon trends.
struct TrendAlignment;

impl Estimator for TrendAlignment {
    fn name(&self) -> &'static str {
        "trend_alignment"
    }

    fn feature(&self, candles: &[PricePoint]) -> Option<f64> {
        let closes = closes(candles);
        let short = window_return(&closes, 10)?;
        let long = window_return(&closes, 25)?;
        if short.signum() == long.signum() {
            // Aligned horizons reinforce; magnitude from the blended move
            Some((short + long) / 2.0)
        } else {
            // Conflicting horizons cancel out
            Some(0.0)
        }
    }
}

// =============================================================================
// Predictor
// =============================================================================

/// Weighted consensus over the estimator pool.
pub struct EnsemblePredictor {
    models: Vec<Box<dyn Estimator>>,
    /// Per-model weights aligned with `all_models()` order, summing to 1.
    weights: [f64; 6],
    /// Seed for the confidence-jitter generator.
    seed: u64,
}

impl EnsemblePredictor {
    pub fn new(weights: [f64; 6], seed: u64) -> Self {
        Self {
            models: all_models(),
            weights,
            seed,
        }
    }

    /// Compute the weighted consensus for a price snapshot.
    ///
    /// With fewer than [`MIN_HISTORY`] points the result is a flat neutral
    /// consensus, never an error.
    pub fn predict(&self, candles: &[PricePoint]) -> EnsembleConsensus {
        if candles.len() < MIN_HISTORY {
            debug!(
                points = candles.len(),
                min = MIN_HISTORY,
                "insufficient history for ensemble"
            );
            return EnsembleConsensus::insufficient();
        }

        let close = match candles.last() {
            Some(c) => c.close,
            None => return EnsembleConsensus::insufficient(),
        };

        // Fresh generator per computation keeps predictions reproducible.
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut predictions = Vec::with_capacity(self.models.len());
        let mut used_weights = Vec::with_capacity(self.models.len());

        for (model, &weight) in self.models.iter().zip(self.weights.iter()) {
            let Some(feature) = model.feature(candles) else {
                continue;
            };
            let jitter = rng.gen_range(-CONFIDENCE_JITTER..=CONFIDENCE_JITTER);
            let confidence = (feature.abs() * 4000.0 + jitter)
                .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
            let capped_move = feature.clamp(-MAX_TARGET_MOVE, MAX_TARGET_MOVE);

            predictions.push(ModelPrediction {
                model: model.name().to_string(),
                direction: PredictionDirection::from_signed(feature, DIRECTION_DEAD_ZONE),
                confidence,
                target_price: close * (1.0 + capped_move),
                probability: confidence / 100.0,
            });
            used_weights.push(weight);
        }

        if predictions.is_empty() {
            return EnsembleConsensus::insufficient();
        }

        // Direction vote: accumulated weight per label, ties favor neutral.
        let mut bullish = 0.0;
        let mut bearish = 0.0;
        let mut neutral = 0.0;
        for (prediction, &weight) in predictions.iter().zip(used_weights.iter()) {
            match prediction.direction {
                PredictionDirection::Bullish => bullish += weight,
                PredictionDirection::Bearish => bearish += weight,
                PredictionDirection::Neutral => neutral += weight,
            }
        }
        let direction = if bullish > bearish && bullish > neutral {
            PredictionDirection::Bullish
        } else if bearish > bullish && bearish > neutral {
            PredictionDirection::Bearish
        } else {
            PredictionDirection::Neutral
        };

        let weight_sum: f64 = used_weights.iter().sum();
        let confidence = predictions
            .iter()
            .zip(used_weights.iter())
            .map(|(p, w)| p.confidence * w)
            .sum::<f64>()
            / weight_sum;

        let target_denominator: f64 = predictions
            .iter()
            .zip(used_weights.iter())
            .map(|(p, w)| w * p.confidence)
            .sum();
        let target_price = if target_denominator > 0.0 {
            predictions
                .iter()
                .zip(used_weights.iter())
                .map(|(p, w)| p.target_price * w * p.confidence)
                .sum::<f64>()
                / target_denominator
        } else {
            close
        };

        EnsembleConsensus {
            direction,
            confidence,
            target_price,
            predictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEIGHTS: [f64; 6] = [0.25, 0.20, 0.15, 0.15, 0.10, 0.15];

    fn predictor() -> EnsemblePredictor {
        EnsemblePredictor::new(WEIGHTS, 7)
    }

    fn uptrend(count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 1.5;
                PricePoint {
                    time: 1_000_000 + i as i64 * 60_000,
                    open: base,
                    high: base + 2.0,
                    low: base - 1.0,
                    close: base + 1.0,
                    volume: Some(1000.0),
                }
            })
            .collect()
    }

    fn downtrend(count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| {
                let base = 300.0 - i as f64 * 1.5;
                PricePoint {
                    time: 1_000_000 + i as i64 * 60_000,
                    open: base,
                    high: base + 1.0,
                    low: base - 2.0,
                    close: base - 1.0,
                    volume: Some(1000.0),
                }
            })
            .collect()
    }

    #[test]
    fn test_insufficient_history_is_flat_neutral() {
        let consensus = predictor().predict(&uptrend(29));
        assert_eq!(consensus.direction, PredictionDirection::Neutral);
        assert_eq!(consensus.confidence, 0.0);
        assert!(consensus.predictions.is_empty());
    }

    #[test]
    fn test_uptrend_consensus_is_bullish() {
        let consensus = predictor().predict(&uptrend(60));
        assert_eq!(consensus.direction, PredictionDirection::Bullish);
        assert!(consensus.confidence > 0.0);
    }

    #[test]
    fn test_downtrend_consensus_is_bearish() {
        let consensus = predictor().predict(&downtrend(60));
        assert_eq!(consensus.direction, PredictionDirection::Bearish);
    }

    #[test]
    fn test_target_within_model_hull() {
        let consensus = predictor().predict(&uptrend(60));
        let targets: Vec<f64> = consensus
            .predictions
            .iter()
            .map(|p| p.target_price)
            .collect();
        let min = targets.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = targets.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        assert!(
            consensus.target_price >= min && consensus.target_price <= max,
            "target {} outside [{}, {}]",
            consensus.target_price,
            min,
            max
        );
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let candles = uptrend(60);
        let a = EnsemblePredictor::new(WEIGHTS, 42).predict(&candles);
        let b = EnsemblePredictor::new(WEIGHTS, 42).predict(&candles);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.target_price, b.target_price);
        for (x, y) in a.predictions.iter().zip(b.predictions.iter()) {
            assert_eq!(x.confidence, y.confidence);
        }
    }

    #[test]
    fn test_flat_series_is_neutral() {
        let candles: Vec<PricePoint> = (0..60)
            .map(|i| PricePoint {
                time: i as i64 * 60_000,
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0,
                volume: None,
            })
            .collect();
        let consensus = predictor().predict(&candles);
        assert_eq!(consensus.direction, PredictionDirection::Neutral);
    }

    #[test]
    fn test_all_six_models_report() {
        let consensus = predictor().predict(&uptrend(60));
        assert_eq!(consensus.predictions.len(), 6);
        let names: Vec<&str> = consensus.predictions.iter().map(|p| p.model.as_str()).collect();
        assert!(names.contains(&"momentum"));
        assert!(names.contains(&"trend_alignment"));
    }
}
