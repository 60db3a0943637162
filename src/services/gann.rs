//! Gann square-root-spiral level engine.
//!
//! Derives geometric price levels, fan angles and time-cycle projections from
//! a center price and pivot date. Everything here is a pure function of its
//! inputs; strength and significance come from fixed degree lookups, never
//! randomness.
//!
//! The core identity: for a center price P with `root = sqrt(P)`, the level
//! at angular offset `d` degrees is `(root + d/360)^2`. One full rotation of
//! the spiral (360 degrees) advances the root by exactly 1.

use crate::types::{
    FanRatio, GannAnalysis, GannBand, GannFanLine, GannLevel, GannLevelKind, Significance,
    SquareVariant, TimeCycle,
};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

// =============================================================================
// Constants
// =============================================================================

/// Cardinal/ordinal spiral reach, in degrees either side of the center.
const MAX_SPIRAL_DEGREE: i32 = 720;

/// Ladder depth for the square variants.
const LADDER_RUNGS: usize = 6;

/// Forward time-cycle day offsets from a pivot date.
const TIME_CYCLE_DAYS: [u32; 9] = [7, 21, 30, 45, 52, 90, 144, 180, 360];

/// Day offsets considered high-significance anniversaries.
const HIGH_SIGNIFICANCE_DAYS: [u32; 4] = [90, 144, 180, 360];

// =============================================================================
// Engine
// =============================================================================

/// Square-root-spiral price level engine.
#[derive(Debug, Clone, Default)]
pub struct GannLevelEngine;

impl GannLevelEngine {
    pub fn new() -> Self {
        Self
    }

    /// Price at a signed angular offset from the center.
    ///
    /// Returns None when the offset pushes the square root argument to or
    /// below zero (degenerate geometry, excluded rather than reported).
    pub fn price_at_degree(center: f64, degree: f64) -> Option<f64> {
        if center <= 0.0 {
            return None;
        }
        let root = center.sqrt() + degree / 360.0;
        if root <= 0.0 {
            return None;
        }
        Some(root * root)
    }

    /// Cardinal levels: 90-degree steps out to `MAX_SPIRAL_DEGREE`, including
    /// the degree-0 pivot. The level at degree 0 equals the center exactly.
    pub fn cardinal_levels(&self, center: f64) -> Vec<GannLevel> {
        let mut levels = Vec::new();
        let mut degree = -MAX_SPIRAL_DEGREE;
        while degree <= MAX_SPIRAL_DEGREE {
            if let Some(price) = Self::price_at_degree(center, degree as f64) {
                let kind = if degree == 0 {
                    GannLevelKind::Pivot
                } else {
                    GannLevelKind::Cardinal
                };
                levels.push(GannLevel {
                    degree,
                    price,
                    kind,
                    strength: Self::degree_strength(degree),
                    significance: Self::degree_significance(degree),
                });
            }
            degree += 90;
        }
        levels
    }

    /// Ordinal levels: 45-degree offset steps between the cardinals.
    pub fn ordinal_levels(&self, center: f64) -> Vec<GannLevel> {
        let mut levels = Vec::new();
        let mut degree = -MAX_SPIRAL_DEGREE + 45;
        while degree < MAX_SPIRAL_DEGREE {
            if degree % 90 != 0 {
                if let Some(price) = Self::price_at_degree(center, degree as f64) {
                    levels.push(GannLevel {
                        degree,
                        price,
                        kind: GannLevelKind::Ordinal,
                        strength: Self::degree_strength(degree),
                        significance: Self::degree_significance(degree),
                    });
                }
            }
            degree += 90;
        }
        levels
    }

    /// Support/resistance ladder for one square variant.
    ///
    /// Resistance rungs step the root up, support rungs step it down. Support
    /// rungs whose root argument drops to or below zero are silently excluded
    /// from the output.
    pub fn square_ladder(&self, center: f64, variant: SquareVariant) -> Vec<GannLevel> {
        let mut levels = Vec::new();
        for degree in variant.degrees(LADDER_RUNGS) {
            if let Some(price) = Self::price_at_degree(center, degree as f64) {
                levels.push(GannLevel {
                    degree,
                    price,
                    kind: GannLevelKind::Resistance,
                    strength: Self::degree_strength(degree),
                    significance: Self::degree_significance(degree),
                });
            }
            if let Some(price) = Self::price_at_degree(center, -degree as f64) {
                levels.push(GannLevel {
                    degree: -degree,
                    price,
                    kind: GannLevelKind::Support,
                    strength: Self::degree_strength(degree),
                    significance: Self::degree_significance(degree),
                });
            } else {
                debug!(
                    center,
                    degree, "support rung below zero root, excluding from ladder"
                );
            }
        }
        levels.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal));
        levels
    }

    /// Gann fan lines projected `elapsed` periods from a pivot.
    ///
    /// `price_unit` is the price move of the 1x1 line per period; lines with
    /// slope >= 1 are classified resistance, flatter lines support.
    pub fn fan_lines(&self, pivot_price: f64, price_unit: f64, elapsed: f64) -> Vec<GannFanLine> {
        FanRatio::all()
            .iter()
            .map(|ratio| {
                let slope = ratio.slope();
                let kind = if slope >= 1.0 {
                    GannLevelKind::Resistance
                } else {
                    GannLevelKind::Support
                };
                GannFanLine {
                    ratio: *ratio,
                    slope,
                    price: pivot_price + price_unit * slope * elapsed,
                    kind,
                }
            })
            .collect()
    }

    /// Default fan price unit: one degree of the pivot square per period.
    pub fn default_price_unit(pivot_price: f64) -> f64 {
        pivot_price / 360.0
    }

    /// Forward time cycles from a pivot date.
    pub fn time_cycles(&self, pivot_date: DateTime<Utc>) -> Vec<TimeCycle> {
        TIME_CYCLE_DAYS
            .iter()
            .map(|&days| {
                let date = pivot_date + Duration::days(days as i64);
                let significance = if HIGH_SIGNIFICANCE_DAYS.contains(&days) {
                    Significance::High
                } else {
                    Significance::Medium
                };
                TimeCycle {
                    days,
                    date: date.timestamp_millis(),
                    significance,
                }
            })
            .collect()
    }

    /// Nearest support below and resistance above `price`, drawn from the
    /// square-of-90 ladder around `center`. None when the ladder does not
    /// bracket the price.
    pub fn nearest_band(&self, center: f64, price: f64) -> Option<GannBand> {
        let ladder = self.square_ladder(center, SquareVariant::SquareOf90);
        let support = ladder
            .iter()
            .filter(|l| l.kind == GannLevelKind::Support && l.price < price)
            .map(|l| l.price)
            .fold(f64::NEG_INFINITY, f64::max);
        let resistance = ladder
            .iter()
            .filter(|l| l.kind == GannLevelKind::Resistance && l.price > price)
            .map(|l| l.price)
            .fold(f64::INFINITY, f64::min);

        if support.is_finite() && resistance.is_finite() {
            Some(GannBand {
                support,
                resistance,
            })
        } else {
            None
        }
    }

    /// Full analysis bundle: spiral levels, all three ladders, fan at one
    /// period elapsed, and forward time cycles.
    pub fn analyze(&self, center: f64, now: DateTime<Utc>) -> GannAnalysis {
        let mut levels = self.cardinal_levels(center);
        levels.extend(self.ordinal_levels(center));
        for variant in [
            SquareVariant::SquareOf90,
            SquareVariant::SquareOf144,
            SquareVariant::SquareOf360,
        ] {
            levels.extend(self.square_ladder(center, variant));
        }
        levels.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal));

        let fan = self.fan_lines(center, Self::default_price_unit(center), 1.0);
        let time_cycles = self.time_cycles(now);
        let band = self.nearest_band(center, center);

        GannAnalysis {
            center,
            levels,
            fan,
            time_cycles,
            band,
            timestamp: now.timestamp_millis(),
        }
    }

    /// Strength 0-100 from the degree-multiple lookup: full rotations
    /// strongest, then half rotations, quarters, and 45-degree offsets.
    fn degree_strength(degree: i32) -> f64 {
        let m = degree.abs();
        if m == 0 {
            100.0
        } else if m % 360 == 0 {
            90.0
        } else if m % 180 == 0 {
            80.0
        } else if m % 90 == 0 {
            70.0
        } else if m % 45 == 0 {
            55.0
        } else {
            40.0
        }
    }

    fn degree_significance(degree: i32) -> Significance {
        let m = degree.abs();
        if m % 360 == 0 {
            Significance::High
        } else if m % 90 == 0 {
            Significance::Medium
        } else {
            Significance::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const CENTER: f64 = 104_525.0;

    #[test]
    fn test_degree_zero_is_exact_center() {
        let engine = GannLevelEngine::new();
        let levels = engine.cardinal_levels(CENTER);
        let pivot = levels.iter().find(|l| l.degree == 0).unwrap();
        assert_eq!(pivot.kind, GannLevelKind::Pivot);
        assert!((pivot.price - CENTER).abs() < 1e-9);
    }

    #[test]
    fn test_degree_90_worked_example() {
        // root ~= 323.303; (root + 0.25)^2 ~= 104686.7
        let price = GannLevelEngine::price_at_degree(CENTER, 90.0).unwrap();
        assert!((price - 104_686.7).abs() < 1.0, "got {}", price);
        // Exact identity: (sqrt(P) + 1/4)^2 = P + sqrt(P)/2 + 1/16
        let expected = CENTER + CENTER.sqrt() / 2.0 + 0.0625;
        assert!((price - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cardinal_levels_monotonic_in_degree() {
        let engine = GannLevelEngine::new();
        let levels = engine.cardinal_levels(CENTER);
        for pair in levels.windows(2) {
            assert!(pair[0].degree < pair[1].degree);
            assert!(
                pair[0].price < pair[1].price,
                "prices must rise with degree: {} vs {}",
                pair[0].price,
                pair[1].price
            );
        }
    }

    #[test]
    fn test_ordinal_levels_skip_cardinals() {
        let engine = GannLevelEngine::new();
        for level in engine.ordinal_levels(CENTER) {
            assert_ne!(level.degree % 90, 0);
            assert_eq!(level.kind, GannLevelKind::Ordinal);
        }
    }

    #[test]
    fn test_support_rungs_excluded_below_zero_root() {
        let engine = GannLevelEngine::new();
        // sqrt(1.0) = 1.0; a 360-degree support step lands the root exactly
        // at zero and everything deeper goes negative.
        let ladder = engine.square_ladder(1.0, SquareVariant::SquareOf360);
        assert!(ladder
            .iter()
            .all(|l| l.kind != GannLevelKind::Support));
        // Resistance side is unaffected
        assert_eq!(
            ladder
                .iter()
                .filter(|l| l.kind == GannLevelKind::Resistance)
                .count(),
            LADDER_RUNGS
        );
    }

    #[test]
    fn test_square_of_90_ladder_brackets_center() {
        let engine = GannLevelEngine::new();
        let ladder = engine.square_ladder(CENTER, SquareVariant::SquareOf90);
        assert!(ladder
            .iter()
            .any(|l| l.kind == GannLevelKind::Support && l.price < CENTER));
        assert!(ladder
            .iter()
            .any(|l| l.kind == GannLevelKind::Resistance && l.price > CENTER));
    }

    #[test]
    fn test_fan_classification() {
        let engine = GannLevelEngine::new();
        let fan = engine.fan_lines(100.0, 1.0, 10.0);
        assert_eq!(fan.len(), 9);
        for line in &fan {
            if line.slope >= 1.0 {
                assert_eq!(line.kind, GannLevelKind::Resistance);
            } else {
                assert_eq!(line.kind, GannLevelKind::Support);
            }
        }
        // 1x1 at 10 periods with unit 1.0
        let one_by_one = fan.iter().find(|l| l.ratio == FanRatio::OneByOne).unwrap();
        assert!((one_by_one.price - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_cycles_table() {
        let engine = GannLevelEngine::new();
        let pivot = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let cycles = engine.time_cycles(pivot);
        assert_eq!(cycles.len(), 9);
        let ninety = cycles.iter().find(|c| c.days == 90).unwrap();
        assert_eq!(ninety.significance, Significance::High);
        let seven = cycles.iter().find(|c| c.days == 7).unwrap();
        assert_eq!(seven.significance, Significance::Medium);
        assert_eq!(
            seven.date,
            (pivot + Duration::days(7)).timestamp_millis()
        );
    }

    #[test]
    fn test_nearest_band_brackets_price() {
        let engine = GannLevelEngine::new();
        let band = engine.nearest_band(CENTER, CENTER).unwrap();
        assert!(band.support < CENTER);
        assert!(band.resistance > CENTER);
    }

    #[test]
    fn test_analyze_bundle() {
        let engine = GannLevelEngine::new();
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let analysis = engine.analyze(CENTER, now);
        assert!(!analysis.levels.is_empty());
        assert_eq!(analysis.fan.len(), 9);
        assert_eq!(analysis.time_cycles.len(), 9);
        assert!(analysis.band.is_some());
        // Levels sorted by price
        for pair in analysis.levels.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }
    }
}
