use serde::{Deserialize, Serialize};

/// A single OHLC price observation.
///
/// The price history buffer stores these in arrival order; all analytical
/// engines treat the sequence as read-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Unix timestamp (milliseconds).
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    /// True range against the previous candle.
    pub fn true_range(&self, previous: &PricePoint) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - previous.close).abs();
        let lc = (self.low - previous.close).abs();
        hl.max(hc).max(lc)
    }
}

/// Request body for pushing a tick into a symbol's price history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickRequest {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    /// Unix timestamp (milliseconds). Defaults to server time when omitted.
    #[serde(default)]
    pub time: Option<i64>,
}

/// Response for the tick ingestion endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickResponse {
    pub symbol: String,
    /// Number of points currently held for the symbol.
    pub points: usize,
    pub timestamp: i64,
}
