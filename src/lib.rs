//! Augur - composite trading signal server.
//!
//! Computes one explainable trading signal per symbol by fusing four
//! independent analytical views of the same price series: Gann square-root
//! levels, a coarse planetary-cycle model, a technical indicator pipeline,
//! and a statistical prediction ensemble.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use services::{HistoryStore, SignalFusionEngine};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub history: Arc<HistoryStore>,
    pub fusion: Arc<SignalFusionEngine>,
}

impl AppState {
    /// Wire the shared state from a validated configuration.
    pub fn new(config: config::Config) -> Self {
        let history = Arc::new(HistoryStore::new(config.signal.buffer_capacity));
        let fusion = Arc::new(SignalFusionEngine::new(config.signal.clone()));
        Self {
            config: Arc::new(config),
            history,
            fusion,
        }
    }
}

// Re-export commonly used types
pub use types::*;
