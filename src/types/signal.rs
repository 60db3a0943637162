use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Final direction of a fused trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDirection {
    Buy,
    Sell,
    Neutral,
}

impl SignalDirection {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
            SignalDirection::Neutral => "NEUTRAL",
        }
    }
}

/// The four fused analytical subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Gann,
    Astro,
    Technical,
    Ensemble,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Gann => "gann",
            SourceKind::Astro => "astro",
            SourceKind::Technical => "technical",
            SourceKind::Ensemble => "ensemble",
        }
    }
}

/// One subsystem's contribution to the composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContribution {
    pub source: SourceKind,
    /// Normalized bullish probability in [0, 1].
    pub score: f64,
    /// Effective fusion weight after renormalization.
    pub weight: f64,
    /// The subsystem's own confidence, 0-100.
    pub confidence: f64,
}

impl SourceContribution {
    /// Directional lean of this contribution against the 0.5 midpoint.
    pub fn lean(&self) -> SignalDirection {
        if self.score > 0.5 {
            SignalDirection::Buy
        } else if self.score < 0.5 {
            SignalDirection::Sell
        } else {
            SignalDirection::Neutral
        }
    }
}

/// A fused trading signal.
///
/// Created fresh on every computation and never mutated afterwards. A signal
/// with `direction == Neutral` and `confidence == 0` means "no actionable
/// signal", not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSignal {
    pub id: Uuid,
    pub symbol: String,
    pub direction: SignalDirection,
    /// 0-100, distance of the composite from the 0.5 midpoint.
    pub strength: f64,
    /// 0-100, agreement-scaled blend of subsystem confidences.
    pub confidence: f64,
    /// Composite bullish probability in [0, 1].
    pub composite: f64,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward: f64,
    /// Per-subsystem contributions, strongest lean first.
    pub sources: Vec<SourceContribution>,
    /// Human-readable rationale, strongest contributor first.
    pub reasoning: Vec<String>,
    /// Unix timestamp (milliseconds) when computed.
    pub timestamp: i64,
}

impl TradingSignal {
    /// The no-actionable-signal sentinel for degraded inputs.
    pub fn neutral(symbol: String, timestamp: i64, reason: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol,
            direction: SignalDirection::Neutral,
            strength: 0.0,
            confidence: 0.0,
            composite: 0.5,
            entry: 0.0,
            stop_loss: 0.0,
            take_profit: 0.0,
            risk_reward: 0.0,
            sources: Vec::new(),
            reasoning: vec![reason.to_string()],
            timestamp,
        }
    }

    /// True when consumers should act on this signal.
    pub fn is_actionable(&self) -> bool {
        self.direction != SignalDirection::Neutral && self.confidence > 0.0
    }
}
