use crate::error::ConfigError;
use crate::types::AspectKind;
use std::env;

/// Per-aspect orb tolerances in degrees.
#[derive(Debug, Clone, Copy)]
pub struct AspectOrbs {
    pub conjunction: f64,
    pub sextile: f64,
    pub square: f64,
    pub trine: f64,
    pub opposition: f64,
}

impl Default for AspectOrbs {
    fn default() -> Self {
        Self {
            conjunction: 8.0,
            sextile: 6.0,
            square: 8.0,
            trine: 8.0,
            opposition: 8.0,
        }
    }
}

impl AspectOrbs {
    /// Orb tolerance for one aspect geometry.
    pub fn for_kind(&self, kind: AspectKind) -> f64 {
        match kind {
            AspectKind::Conjunction => self.conjunction,
            AspectKind::Sextile => self.sextile,
            AspectKind::Square => self.square,
            AspectKind::Trine => self.trine,
            AspectKind::Opposition => self.opposition,
        }
    }
}

/// Warm-up windows for the technical indicator pipeline.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorPeriods {
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    /// Standard deviation multiplier for the Bollinger bands.
    pub bollinger_k: f64,
    pub atr_period: usize,
    pub stochastic_k: usize,
    pub stochastic_d: usize,
    pub sma_short: usize,
    pub sma_long: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_window: 20,
            bollinger_k: 2.0,
            atr_period: 14,
            stochastic_k: 14,
            stochastic_d: 3,
            sma_short: 20,
            sma_long: 50,
        }
    }
}

/// Fusion weights for the four subsystems. Must sum to 1.
#[derive(Debug, Clone, Copy)]
pub struct FusionWeights {
    pub gann: f64,
    pub astro: f64,
    pub technical: f64,
    pub ensemble: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            gann: 0.25,
            astro: 0.15,
            technical: 0.35,
            ensemble: 0.25,
        }
    }
}

impl FusionWeights {
    pub fn sum(&self) -> f64 {
        self.gann + self.astro + self.technical + self.ensemble
    }
}

/// Composite-score decision thresholds. Upper must exceed lower.
#[derive(Debug, Clone, Copy)]
pub struct FusionThresholds {
    pub upper: f64,
    pub lower: f64,
}

impl Default for FusionThresholds {
    fn default() -> Self {
        Self {
            upper: 0.58,
            lower: 0.42,
        }
    }
}

/// Static configuration for the signal engines.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Ring buffer capacity per symbol.
    pub buffer_capacity: usize,
    pub indicator_periods: IndicatorPeriods,
    pub aspect_orbs: AspectOrbs,
    /// Ensemble model weights in `all_models()` order. Must sum to 1.
    pub ensemble_weights: [f64; 6],
    /// Seed for the ensemble confidence-jitter generator.
    pub ensemble_seed: u64,
    pub fusion_weights: FusionWeights,
    pub fusion_thresholds: FusionThresholds,
    /// Take-profit distance as a multiple of the stop distance.
    pub risk_reward_multiple: f64,
    /// Stop distance as a multiple of ATR.
    pub atr_stop_multiplier: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 500,
            indicator_periods: IndicatorPeriods::default(),
            aspect_orbs: AspectOrbs::default(),
            ensemble_weights: [0.25, 0.20, 0.15, 0.15, 0.10, 0.15],
            ensemble_seed: 0x5EED,
            fusion_weights: FusionWeights::default(),
            fusion_thresholds: FusionThresholds::default(),
            risk_reward_multiple: 2.0,
            atr_stop_multiplier: 1.5,
        }
    }
}

/// Weight sums may drift by at most this much from 1.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl SignalConfig {
    /// Reject invariant violations before any computation runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ensemble_sum: f64 = self.ensemble_weights.iter().sum();
        if (ensemble_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum {
                which: "ensemble_weights",
                sum: ensemble_sum,
            });
        }

        let fusion_sum = self.fusion_weights.sum();
        if (fusion_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum {
                which: "fusion_weights",
                sum: fusion_sum,
            });
        }

        let thresholds = self.fusion_thresholds;
        if thresholds.upper <= thresholds.lower {
            return Err(ConfigError::ThresholdOrder {
                upper: thresholds.upper,
                lower: thresholds.lower,
            });
        }

        if self.buffer_capacity == 0 {
            return Err(ConfigError::EmptyBuffer);
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    pub signal: SignalConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = SignalConfig::default();
        let thresholds = FusionThresholds {
            upper: env_parse("FUSION_UPPER_THRESHOLD", defaults.fusion_thresholds.upper),
            lower: env_parse("FUSION_LOWER_THRESHOLD", defaults.fusion_thresholds.lower),
        };
        let fusion_weights = FusionWeights {
            gann: env_parse("FUSION_WEIGHT_GANN", defaults.fusion_weights.gann),
            astro: env_parse("FUSION_WEIGHT_ASTRO", defaults.fusion_weights.astro),
            technical: env_parse("FUSION_WEIGHT_TECHNICAL", defaults.fusion_weights.technical),
            ensemble: env_parse("FUSION_WEIGHT_ENSEMBLE", defaults.fusion_weights.ensemble),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT", 3001),
            signal: SignalConfig {
                buffer_capacity: env_parse("BUFFER_CAPACITY", defaults.buffer_capacity),
                ensemble_seed: env_parse("ENSEMBLE_SEED", defaults.ensemble_seed),
                risk_reward_multiple: env_parse(
                    "RISK_REWARD_MULTIPLE",
                    defaults.risk_reward_multiple,
                ),
                atr_stop_multiplier: env_parse(
                    "ATR_STOP_MULTIPLIER",
                    defaults.atr_stop_multiplier,
                ),
                fusion_thresholds: thresholds,
                fusion_weights,
                ..defaults
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            signal: SignalConfig::default(),
        }
    }
}
