//! Signal fusion engine.
//!
//! Normalizes the four subsystem outputs onto one [0, 1] bullish-probability
//! scale, weights them into a composite score, and derives the final
//! direction, strength, confidence and risk levels. The computation is a
//! pure function of (price snapshot, wall-clock date, static configuration):
//! same inputs, same signal.
//!
//! Degraded inputs never raise errors. A subsystem that cannot produce a
//! score is omitted and the remaining fusion weights are renormalized over
//! the available set; when the history is too short to define an ATR there
//! is no basis for risk levels and the engine emits the neutral
//! no-actionable-signal sentinel instead.

use crate::config::SignalConfig;
use crate::services::astro::AstroCycleEngine;
use crate::services::ensemble::EnsemblePredictor;
use crate::services::gann::GannLevelEngine;
use crate::services::indicators::TechnicalIndicatorPipeline;
use crate::types::{
    GannBand, PredictionDirection, PricePoint, SignalDirection, SourceContribution, SourceKind,
    TradingSignal,
};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// How many subsystems the reasoning list names.
const REASONING_TOP_N: usize = 3;

/// Fuses the four analytical subsystems into one trading signal.
pub struct SignalFusionEngine {
    config: SignalConfig,
    gann: GannLevelEngine,
    astro: AstroCycleEngine,
    technical: TechnicalIndicatorPipeline,
    ensemble: EnsemblePredictor,
}

impl SignalFusionEngine {
    pub fn new(config: SignalConfig) -> Self {
        let gann = GannLevelEngine::new();
        let astro = AstroCycleEngine::new(config.aspect_orbs);
        let technical = TechnicalIndicatorPipeline::new(config.indicator_periods);
        let ensemble = EnsemblePredictor::new(config.ensemble_weights, config.ensemble_seed);
        Self {
            config,
            gann,
            astro,
            technical,
            ensemble,
        }
    }

    pub fn gann(&self) -> &GannLevelEngine {
        &self.gann
    }

    pub fn astro(&self) -> &AstroCycleEngine {
        &self.astro
    }

    pub fn technical(&self) -> &TechnicalIndicatorPipeline {
        &self.technical
    }

    /// Position of `price` within a support/resistance band as a bullish
    /// probability: 1 at the support (room to rise), 0 at the resistance.
    pub fn band_position(price: f64, band: &GannBand) -> f64 {
        let width = band.resistance - band.support;
        if width <= 0.0 {
            return 0.5;
        }
        ((band.resistance - price) / width).clamp(0.0, 1.0)
    }

    /// Composite score over already-renormalized contributions.
    pub fn composite(sources: &[SourceContribution]) -> f64 {
        sources.iter().map(|s| s.score * s.weight).sum()
    }

    /// Compute the fused signal for one symbol.
    pub fn compute(
        &self,
        symbol: &str,
        snapshot: &[PricePoint],
        now: DateTime<Utc>,
    ) -> TradingSignal {
        let timestamp = now.timestamp_millis();
        let Some(close) = snapshot.last().map(|c| c.close) else {
            return TradingSignal::neutral(
                symbol.to_string(),
                timestamp,
                "insufficient price history",
            );
        };

        let analysis = self.technical.analyze(snapshot);
        let Some(atr) = analysis.summary.atr else {
            // No ATR means no stop distance; nothing actionable to emit.
            debug!(symbol, points = snapshot.len(), "history below ATR warm-up");
            return TradingSignal::neutral(
                symbol.to_string(),
                timestamp,
                "insufficient price history",
            );
        };

        // Gather the available subsystem scores on the common scale.
        let weights = self.config.fusion_weights;
        let mut raw: Vec<(SourceKind, f64, f64, f64)> = Vec::with_capacity(4);

        if let Some(band) = self.gann.nearest_band(close, close) {
            let score = Self::band_position(close, &band);
            let confidence = (score - 0.5).abs() * 200.0;
            raw.push((SourceKind::Gann, score, weights.gann, confidence));
        }

        let astro_snapshot = self.astro.snapshot(now);
        raw.push((
            SourceKind::Astro,
            astro_snapshot.sentiment.score / 100.0,
            weights.astro,
            AstroCycleEngine::confidence(&astro_snapshot.sentiment),
        ));

        if let (Some(score), Some(confidence)) = (analysis.bullish_score(), analysis.confidence())
        {
            raw.push((SourceKind::Technical, score, weights.technical, confidence));
        }

        let consensus = self.ensemble.predict(snapshot);
        if !consensus.predictions.is_empty() {
            let score = match consensus.direction {
                PredictionDirection::Bullish => 0.5 + consensus.confidence / 200.0,
                PredictionDirection::Bearish => 0.5 - consensus.confidence / 200.0,
                PredictionDirection::Neutral => 0.5,
            };
            raw.push((
                SourceKind::Ensemble,
                score,
                weights.ensemble,
                consensus.confidence,
            ));
        }

        let weight_total: f64 = raw.iter().map(|(_, _, w, _)| w).sum();
        if weight_total <= 0.0 {
            return TradingSignal::neutral(symbol.to_string(), timestamp, "no subsystem output");
        }

        // Renormalize over the available subsystems; a missing sub-score
        // contributes nothing rather than dragging the composite.
        let mut sources: Vec<SourceContribution> = raw
            .into_iter()
            .map(|(source, score, weight, confidence)| SourceContribution {
                source,
                score,
                weight: weight / weight_total,
                confidence,
            })
            .collect();

        let composite = Self::composite(&sources);
        let thresholds = self.config.fusion_thresholds;
        let direction = if composite > thresholds.upper {
            SignalDirection::Buy
        } else if composite < thresholds.lower {
            SignalDirection::Sell
        } else {
            SignalDirection::Neutral
        };

        let strength = ((composite - 0.5).abs() * 200.0).clamp(0.0, 100.0);

        // Confidence: weighted subsystem confidence, scaled by how many
        // subsystems lean with the final direction. Full agreement doubles
        // the floor factor; total disagreement halves it.
        let blended_confidence: f64 = sources.iter().map(|s| s.confidence * s.weight).sum();
        let agreeing = sources.iter().filter(|s| s.lean() == direction).count();
        let agreement = 0.5 + 0.5 * (agreeing as f64 / sources.len() as f64);
        let confidence = (blended_confidence * agreement).clamp(0.0, 100.0);

        // Risk levels: stop from ATR, target from the configured multiple.
        let stop_distance = atr * self.config.atr_stop_multiplier;
        let (stop_loss, take_profit) = match direction {
            SignalDirection::Sell => (
                close + stop_distance,
                close - stop_distance * self.config.risk_reward_multiple,
            ),
            _ => (
                close - stop_distance,
                close + stop_distance * self.config.risk_reward_multiple,
            ),
        };

        // Strongest lean first, for both the source list and the rationale.
        sources.sort_by(|a, b| {
            (b.score - 0.5)
                .abs()
                .partial_cmp(&(a.score - 0.5).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut reasoning: Vec<String> = sources
            .iter()
            .take(REASONING_TOP_N)
            .map(|s| {
                format!(
                    "{}: {:.2} bullish probability ({}, weight {:.2})",
                    s.source.name(),
                    s.score,
                    s.lean().label(),
                    s.weight,
                )
            })
            .collect();
        reasoning.push(format!(
            "composite {:.3} against thresholds [{:.2}, {:.2}]",
            composite, thresholds.lower, thresholds.upper
        ));

        TradingSignal {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            direction,
            strength,
            confidence,
            composite,
            entry: close,
            stop_loss,
            take_profit,
            risk_reward: self.config.risk_reward_multiple,
            sources,
            reasoning,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn engine() -> SignalFusionEngine {
        SignalFusionEngine::new(SignalConfig::default())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
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

    fn contribution(source: SourceKind, score: f64, weight: f64) -> SourceContribution {
        SourceContribution {
            source,
            score,
            weight,
            confidence: 50.0,
        }
    }

    #[test]
    fn test_empty_snapshot_is_neutral() {
        let signal = engine().compute("btc", &[], now());
        assert_eq!(signal.direction, SignalDirection::Neutral);
        assert_eq!(signal.confidence, 0.0);
    }

    #[test]
    fn test_short_history_is_neutral_with_zero_confidence() {
        let signal = engine().compute("btc", &uptrend(5), now());
        assert_eq!(signal.direction, SignalDirection::Neutral);
        assert_eq!(signal.confidence, 0.0);
        assert!(!signal.is_actionable());
    }

    #[test]
    fn test_full_history_produces_ordered_risk_levels() {
        let signal = engine().compute("btc", &uptrend(80), now());
        assert!(signal.entry > 0.0);
        match signal.direction {
            SignalDirection::Sell => {
                assert!(signal.stop_loss > signal.entry);
                assert!(signal.take_profit < signal.entry);
            }
            _ => {
                assert!(signal.stop_loss < signal.entry);
                assert!(signal.take_profit > signal.entry);
            }
        }
        assert!(!signal.sources.is_empty());
        assert!(!signal.reasoning.is_empty());
    }

    #[test]
    fn test_composite_monotonic_in_each_source() {
        let base = vec![
            contribution(SourceKind::Gann, 0.4, 0.25),
            contribution(SourceKind::Astro, 0.6, 0.25),
            contribution(SourceKind::Technical, 0.5, 0.25),
            contribution(SourceKind::Ensemble, 0.5, 0.25),
        ];
        let reference = SignalFusionEngine::composite(&base);
        for i in 0..base.len() {
            let mut bumped = base.clone();
            bumped[i].score += 0.1;
            assert!(
                SignalFusionEngine::composite(&bumped) > reference,
                "composite must rise with source {}",
                i
            );
        }
    }

    #[test]
    fn test_band_position_extremes() {
        let band = GannBand {
            support: 90.0,
            resistance: 110.0,
        };
        assert_eq!(SignalFusionEngine::band_position(90.0, &band), 1.0);
        assert_eq!(SignalFusionEngine::band_position(110.0, &band), 0.0);
        assert_eq!(SignalFusionEngine::band_position(100.0, &band), 0.5);
    }

    #[test]
    fn test_weights_renormalized_over_available() {
        let signal = engine().compute("btc", &uptrend(80), now());
        let total: f64 = signal.sources.iter().map(|s| s.weight).sum();
        assert!((total - 1.0).abs() < 1e-9, "weights sum to {}", total);
    }

    #[test]
    fn test_sources_sorted_by_lean_strength() {
        let signal = engine().compute("btc", &uptrend(80), now());
        for pair in signal.sources.windows(2) {
            assert!((pair[0].score - 0.5).abs() >= (pair[1].score - 0.5).abs());
        }
    }

    #[test]
    fn test_same_inputs_same_composite() {
        let candles = uptrend(80);
        let a = engine().compute("btc", &candles, now());
        let b = engine().compute("btc", &candles, now());
        assert_eq!(a.composite, b.composite);
        assert_eq!(a.direction, b.direction);
        assert_eq!(a.confidence, b.confidence);
    }
}
