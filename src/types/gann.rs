use serde::{Deserialize, Serialize};

/// Kind of a Gann price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GannLevelKind {
    /// 90-degree spiral steps (including multiples of 360).
    Cardinal,
    /// 45-degree offset spiral steps.
    Ordinal,
    Support,
    Resistance,
    /// The center price itself (degree 0).
    Pivot,
}

/// Significance tier for a level or time cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Low,
    Medium,
    High,
}

/// A price level derived from square-root-spiral arithmetic.
///
/// For a center price P with `root = sqrt(P)`, the level at angular offset
/// `degree` is `(root + degree/360)^2`. Levels farther from the center in
/// absolute degree move monotonically away from the center price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GannLevel {
    /// Signed angular offset from the center price, in degrees.
    pub degree: i32,
    pub price: f64,
    pub kind: GannLevelKind,
    /// 0-100, from the degree-multiple lookup.
    pub strength: f64,
    pub significance: Significance,
}

/// Square variant selecting the ladder step set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquareVariant {
    /// 90-degree rungs.
    SquareOf90,
    /// Fibonacci multiples of 144 degrees.
    SquareOf144,
    /// Full-rotation rungs.
    SquareOf360,
}

impl SquareVariant {
    /// Degree offsets for the first `count` rungs of this variant.
    pub fn degrees(&self, count: usize) -> Vec<i32> {
        match self {
            SquareVariant::SquareOf90 => (1..=count as i32).map(|i| i * 90).collect(),
            SquareVariant::SquareOf144 => {
                // Fibonacci angle multiples of the 144 square
                const FIB: [i32; 6] = [1, 2, 3, 5, 8, 13];
                FIB.iter().take(count).map(|f| f * 144).collect()
            }
            SquareVariant::SquareOf360 => (1..=count as i32).map(|i| i * 360).collect(),
        }
    }
}

/// Fixed Gann fan ratios, steepest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanRatio {
    EightByOne,
    FourByOne,
    ThreeByOne,
    TwoByOne,
    OneByOne,
    OneByTwo,
    OneByThree,
    OneByFour,
    OneByEight,
}

impl FanRatio {
    /// All fan ratios in drawing order.
    pub fn all() -> [FanRatio; 9] {
        [
            FanRatio::EightByOne,
            FanRatio::FourByOne,
            FanRatio::ThreeByOne,
            FanRatio::TwoByOne,
            FanRatio::OneByOne,
            FanRatio::OneByTwo,
            FanRatio::OneByThree,
            FanRatio::OneByFour,
            FanRatio::OneByEight,
        ]
    }

    /// Slope multiplier in price units per elapsed period.
    pub fn slope(&self) -> f64 {
        match self {
            FanRatio::EightByOne => 8.0,
            FanRatio::FourByOne => 4.0,
            FanRatio::ThreeByOne => 3.0,
            FanRatio::TwoByOne => 2.0,
            FanRatio::OneByOne => 1.0,
            FanRatio::OneByTwo => 0.5,
            FanRatio::OneByThree => 1.0 / 3.0,
            FanRatio::OneByFour => 0.25,
            FanRatio::OneByEight => 0.125,
        }
    }

    /// Display label, e.g. "2x1".
    pub fn label(&self) -> &'static str {
        match self {
            FanRatio::EightByOne => "8x1",
            FanRatio::FourByOne => "4x1",
            FanRatio::ThreeByOne => "3x1",
            FanRatio::TwoByOne => "2x1",
            FanRatio::OneByOne => "1x1",
            FanRatio::OneByTwo => "1x2",
            FanRatio::OneByThree => "1x3",
            FanRatio::OneByFour => "1x4",
            FanRatio::OneByEight => "1x8",
        }
    }
}

/// A projected Gann fan line at a given elapsed period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GannFanLine {
    pub ratio: FanRatio,
    pub slope: f64,
    /// Projected price at the requested elapsed period.
    pub price: f64,
    /// Resistance when slope >= 1, support otherwise.
    pub kind: GannLevelKind,
}

/// A forward time-cycle projection from a pivot date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeCycle {
    /// Day offset from the pivot date.
    pub days: u32,
    /// Projected date, unix milliseconds.
    pub date: i64,
    pub significance: Significance,
}

/// The nearest support/resistance band bracketing a price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GannBand {
    pub support: f64,
    pub resistance: f64,
}

/// Full Gann analysis bundle for one center price and pivot date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GannAnalysis {
    pub center: f64,
    pub levels: Vec<GannLevel>,
    pub fan: Vec<GannFanLine>,
    pub time_cycles: Vec<TimeCycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<GannBand>,
    pub timestamp: i64,
}
