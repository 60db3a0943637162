//! Signal computation endpoints.
//!
//! Ticks are pushed in by the market-data collaborator; signal reads compute
//! fresh from the current buffer snapshot and wall-clock time. A neutral
//! signal with zero confidence means "no actionable signal", never an error.

use crate::error::{AppError, Result};
use crate::services::indicators::{PatternMatch, TechnicalSummary};
use crate::types::{
    AstroSnapshot, GannAnalysis, PricePoint, TickRequest, TickResponse, TradingSignal,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

/// Technical pipeline response: latest values plus pattern matches.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalResponse {
    pub symbol: String,
    pub summary: TechnicalSummary,
    pub patterns: Vec<PatternMatch>,
    pub timestamp: i64,
}

/// Append one OHLC tick to a symbol's history.
async fn push_tick(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Json(tick): Json<TickRequest>,
) -> Result<Json<TickResponse>> {
    if tick.close <= 0.0 {
        return Err(AppError::BadRequest(format!(
            "close must be positive, got {}",
            tick.close
        )));
    }
    if tick.high < tick.low {
        return Err(AppError::BadRequest(format!(
            "high {} below low {}",
            tick.high, tick.low
        )));
    }

    let now = Utc::now().timestamp_millis();
    let point = PricePoint {
        time: tick.time.unwrap_or(now),
        open: tick.open,
        high: tick.high,
        low: tick.low,
        close: tick.close,
        volume: tick.volume,
    };
    let points = state.history.append(&symbol, point);
    debug!(symbol, points, "tick appended");

    Ok(Json(TickResponse {
        symbol: symbol.to_lowercase(),
        points,
        timestamp: now,
    }))
}

/// Compute the fused trading signal for a symbol.
async fn get_signal(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Json<TradingSignal> {
    let snapshot = state.history.snapshot(&symbol);
    let signal = state.fusion.compute(&symbol, &snapshot, Utc::now());
    info!(
        symbol,
        direction = signal.direction.label(),
        strength = signal.strength,
        confidence = signal.confidence,
        "signal computed"
    );
    Json(signal)
}

/// Gann level analysis around the symbol's latest close.
async fn get_gann(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<GannAnalysis>> {
    let close = state
        .history
        .latest_close(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("no price history for {}", symbol)))?;
    Ok(Json(state.fusion.gann().analyze(close, Utc::now())))
}

/// Technical indicator summary for a symbol.
async fn get_technical(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<TechnicalResponse>> {
    let snapshot = state.history.snapshot(&symbol);
    if snapshot.is_empty() {
        return Err(AppError::NotFound(format!("no price history for {}", symbol)));
    }
    let analysis = state.fusion.technical().analyze(&snapshot);
    Ok(Json(TechnicalResponse {
        symbol: symbol.to_lowercase(),
        summary: analysis.summary,
        patterns: analysis.patterns,
        timestamp: Utc::now().timestamp_millis(),
    }))
}

/// Astro snapshot for the current date. Price-independent.
async fn get_astro(State(state): State<AppState>) -> Json<AstroSnapshot> {
    Json(state.fusion.astro().snapshot(Utc::now()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol/ticks", post(push_tick))
        .route("/:symbol", get(get_signal))
        .route("/:symbol/gann", get(get_gann))
        .route("/:symbol/technical", get(get_technical))
}

pub fn astro_router() -> Router<AppState> {
    Router::new().route("/", get(get_astro))
}
