//! Analytical engines and the price history store.

pub mod astro;
pub mod ensemble;
pub mod fusion;
pub mod gann;
pub mod history;
pub mod indicators;

pub use astro::AstroCycleEngine;
pub use ensemble::{all_models, EnsemblePredictor, Estimator};
pub use fusion::SignalFusionEngine;
pub use gann::GannLevelEngine;
pub use history::{HistoryStore, PriceHistoryBuffer};
pub use indicators::{TechnicalAnalysis, TechnicalIndicatorPipeline, TechnicalSummary};
