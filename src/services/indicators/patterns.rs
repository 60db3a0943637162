//! Heuristic chart pattern matcher.
//!
//! Scans fixed-size 5-point sliding windows of closes for three comparative
//! shapes. Confidence is a fixed per-pattern constant; these are coarse
//! heuristics, not statistical classifiers.

use serde::{Deserialize, Serialize};

/// Window size for all pattern rules.
const WINDOW: usize = 5;

/// Shoulder symmetry tolerance as a fraction of the left shoulder.
const SHOULDER_TOLERANCE: f64 = 0.02;

/// Peak symmetry tolerance for double tops.
const DOUBLE_TOP_TOLERANCE: f64 = 0.015;

/// Flat-top tolerance for ascending triangles.
const TRIANGLE_TOLERANCE: f64 = 0.01;

/// Recognized heuristic patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    HeadAndShoulders,
    DoubleTop,
    AscendingTriangle,
}

impl PatternKind {
    /// Fixed confidence attributed to a match, 0-100.
    pub fn confidence(&self) -> f64 {
        match self {
            PatternKind::HeadAndShoulders => 70.0,
            PatternKind::DoubleTop => 65.0,
            PatternKind::AscendingTriangle => 60.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PatternKind::HeadAndShoulders => "Head and shoulders: potential bearish reversal",
            PatternKind::DoubleTop => "Double top: resistance rejected twice",
            PatternKind::AscendingTriangle => "Ascending triangle: bullish continuation setup",
        }
    }
}

/// A matched pattern in the scanned series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub pattern: PatternKind,
    /// End index of the matched window in the input series.
    pub index: usize,
    pub confidence: f64,
    pub description: String,
}

/// Scan all 5-point windows for pattern shapes.
pub fn scan(closes: &[f64]) -> Vec<PatternMatch> {
    let mut matches = Vec::new();
    if closes.len() < WINDOW {
        return matches;
    }

    for (offset, window) in closes.windows(WINDOW).enumerate() {
        let end = offset + WINDOW - 1;
        if let Some(pattern) = match_window(window) {
            matches.push(PatternMatch {
                pattern,
                index: end,
                confidence: pattern.confidence(),
                description: pattern.description().to_string(),
            });
        }
    }
    matches
}

/// Apply the comparative rules to one 5-point window.
fn match_window(w: &[f64]) -> Option<PatternKind> {
    let (a, b, c, d, e) = (w[0], w[1], w[2], w[3], w[4]);

    // Head and shoulders: peaks at b, c, d with c the head and the
    // shoulders roughly level.
    if c > b && c > d && b > a && d > e && b > 0.0 && (b - d).abs() / b < SHOULDER_TOLERANCE {
        return Some(PatternKind::HeadAndShoulders);
    }

    // Double top: two roughly equal peaks at b and d around a dip at c,
    // with the close breaking back under the dip.
    if b > a && b > c && d > c && d > e && c > e && b > 0.0 && (b - d).abs() / b < DOUBLE_TOP_TOLERANCE
    {
        return Some(PatternKind::DoubleTop);
    }

    // Ascending triangle: flat tops at b and d, rising lows a < c < e.
    if b > a && d > e && e > c && c > a && b > 0.0 && (b - d).abs() / b < TRIANGLE_TOLERANCE {
        return Some(PatternKind::AscendingTriangle);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_and_shoulders_match() {
        let closes = [100.0, 110.0, 120.0, 110.5, 100.0];
        let matches = scan(&closes);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pattern, PatternKind::HeadAndShoulders);
        assert_eq!(matches[0].confidence, 70.0);
        assert_eq!(matches[0].index, 4);
    }

    #[test]
    fn test_double_top_match() {
        let closes = [100.0, 110.0, 104.0, 110.5, 100.0];
        let matches = scan(&closes);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pattern, PatternKind::DoubleTop);
    }

    #[test]
    fn test_ascending_triangle_match() {
        let closes = [100.0, 110.0, 103.0, 110.2, 106.0];
        let matches = scan(&closes);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pattern, PatternKind::AscendingTriangle);
    }

    #[test]
    fn test_monotonic_series_has_no_patterns() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert!(scan(&closes).is_empty());
    }

    #[test]
    fn test_short_series_has_no_patterns() {
        assert!(scan(&[1.0, 2.0, 3.0]).is_empty());
    }
}
