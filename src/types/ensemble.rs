use serde::{Deserialize, Serialize};

/// Direction called by a single estimator or by the consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionDirection {
    Bullish,
    Bearish,
    Neutral,
}

impl PredictionDirection {
    /// +1 for bullish, -1 for bearish, 0 for neutral.
    pub fn sign(&self) -> f64 {
        match self {
            PredictionDirection::Bullish => 1.0,
            PredictionDirection::Bearish => -1.0,
            PredictionDirection::Neutral => 0.0,
        }
    }

    /// Direction from a signed feature value with a neutral dead zone.
    pub fn from_signed(value: f64, dead_zone: f64) -> Self {
        if value > dead_zone {
            PredictionDirection::Bullish
        } else if value < -dead_zone {
            PredictionDirection::Bearish
        } else {
            PredictionDirection::Neutral
        }
    }
}

/// Output of a single ensemble estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPrediction {
    /// Estimator name, e.g. "short_momentum".
    pub model: String,
    pub direction: PredictionDirection,
    /// 0-100.
    pub confidence: f64,
    pub target_price: f64,
    /// 0-1, confidence expressed as a probability.
    pub probability: f64,
}

/// Weighted combination of all estimator outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleConsensus {
    pub direction: PredictionDirection,
    /// 0-100, weight-blended across estimators.
    pub confidence: f64,
    /// Confidence-weighted target; 0 when no estimator produced one.
    pub target_price: f64,
    pub predictions: Vec<ModelPrediction>,
}

impl EnsembleConsensus {
    /// Flat neutral consensus for insufficient history.
    pub fn insufficient() -> Self {
        Self {
            direction: PredictionDirection::Neutral,
            confidence: 0.0,
            target_price: 0.0,
            predictions: Vec::new(),
        }
    }
}
