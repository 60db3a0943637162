use serde::{Deserialize, Serialize};

/// The nine modeled bodies, Sun through Neptune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Planet {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Planet {
    /// All bodies in orbital order.
    pub fn all() -> [Planet; 9] {
        [
            Planet::Sun,
            Planet::Moon,
            Planet::Mercury,
            Planet::Venus,
            Planet::Mars,
            Planet::Jupiter,
            Planet::Saturn,
            Planet::Uranus,
            Planet::Neptune,
        ]
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Planet::Sun => "Sun",
            Planet::Moon => "Moon",
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
        }
    }

    /// The luminaries (Sun, Moon) are never flagged retrograde.
    pub fn is_luminary(&self) -> bool {
        matches!(self, Planet::Sun | Planet::Moon)
    }
}

/// Classical element of a zodiac sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    /// Fire and air signs read bullish; earth and water bearish.
    pub fn is_bullish(&self) -> bool {
        matches!(self, Element::Fire | Element::Air)
    }
}

/// The twelve zodiac signs, 30 degrees each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Sign containing a longitude, `floor(longitude / 30)`.
    pub fn from_longitude(longitude: f64) -> Self {
        const SIGNS: [ZodiacSign; 12] = [
            ZodiacSign::Aries,
            ZodiacSign::Taurus,
            ZodiacSign::Gemini,
            ZodiacSign::Cancer,
            ZodiacSign::Leo,
            ZodiacSign::Virgo,
            ZodiacSign::Libra,
            ZodiacSign::Scorpio,
            ZodiacSign::Sagittarius,
            ZodiacSign::Capricorn,
            ZodiacSign::Aquarius,
            ZodiacSign::Pisces,
        ];
        let normalized = longitude.rem_euclid(360.0);
        SIGNS[(normalized / 30.0) as usize % 12]
    }

    pub fn element(&self) -> Element {
        match self {
            ZodiacSign::Aries | ZodiacSign::Leo | ZodiacSign::Sagittarius => Element::Fire,
            ZodiacSign::Taurus | ZodiacSign::Virgo | ZodiacSign::Capricorn => Element::Earth,
            ZodiacSign::Gemini | ZodiacSign::Libra | ZodiacSign::Aquarius => Element::Air,
            ZodiacSign::Cancer | ZodiacSign::Scorpio | ZodiacSign::Pisces => Element::Water,
        }
    }
}

/// A body's approximate ecliptic position on a given date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetaryPosition {
    pub planet: Planet,
    /// Ecliptic longitude in [0, 360).
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub retrograde: bool,
}

/// The five detected aspect geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectKind {
    pub fn all() -> [AspectKind; 5] {
        [
            AspectKind::Conjunction,
            AspectKind::Sextile,
            AspectKind::Square,
            AspectKind::Trine,
            AspectKind::Opposition,
        ]
    }

    /// Target angular separation in degrees.
    pub fn target_angle(&self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Opposition => 180.0,
        }
    }

    /// Market lean conventionally attributed to the geometry.
    pub fn influence(&self) -> Influence {
        match self {
            AspectKind::Conjunction => Influence::Neutral,
            AspectKind::Sextile | AspectKind::Trine => Influence::Bullish,
            AspectKind::Square | AspectKind::Opposition => Influence::Bearish,
        }
    }
}

/// Directional lean of an aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Influence {
    Bullish,
    Bearish,
    Neutral,
}

/// A detected aspect between two bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetaryAspect {
    pub planet1: Planet,
    pub planet2: Planet,
    pub kind: AspectKind,
    /// Actual angular separation, normalized to [0, 180].
    pub angle: f64,
    /// Distance from the exact aspect angle, in degrees.
    pub orb: f64,
    pub influence: Influence,
}

/// Lunar phase, bucketed at fixed 1/8 synodic boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl LunarPhase {
    /// Phase for a synodic cycle fraction in [0, 1).
    pub fn from_fraction(fraction: f64) -> Self {
        let f = fraction.rem_euclid(1.0);
        match (f * 8.0) as usize {
            0 => LunarPhase::NewMoon,
            1 => LunarPhase::WaxingCrescent,
            2 => LunarPhase::FirstQuarter,
            3 => LunarPhase::WaxingGibbous,
            4 => LunarPhase::FullMoon,
            5 => LunarPhase::WaningGibbous,
            6 => LunarPhase::LastQuarter,
            _ => LunarPhase::WaningCrescent,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LunarPhase::NewMoon => "New Moon",
            LunarPhase::WaxingCrescent => "Waxing Crescent",
            LunarPhase::FirstQuarter => "First Quarter",
            LunarPhase::WaxingGibbous => "Waxing Gibbous",
            LunarPhase::FullMoon => "Full Moon",
            LunarPhase::WaningGibbous => "Waning Gibbous",
            LunarPhase::LastQuarter => "Last Quarter",
            LunarPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

/// Named sentiment band for an elemental score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentBand {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

impl SentimentBand {
    /// Band for a score in [0, 100].
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 70.0 => SentimentBand::StrongBullish,
            s if s >= 55.0 => SentimentBand::Bullish,
            s if s >= 45.0 => SentimentBand::Neutral,
            s if s >= 30.0 => SentimentBand::Bearish,
            _ => SentimentBand::StrongBearish,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentBand::StrongBullish => "Strong Bullish",
            SentimentBand::Bullish => "Bullish",
            SentimentBand::Neutral => "Neutral",
            SentimentBand::Bearish => "Bearish",
            SentimentBand::StrongBearish => "Strong Bearish",
        }
    }
}

/// Elemental sentiment reading for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstroSentiment {
    /// 0-100, above 50 is bullish.
    pub score: f64,
    pub band: SentimentBand,
    pub bullish_weight: f64,
    pub bearish_weight: f64,
}

/// Full astro reading for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstroSnapshot {
    pub positions: Vec<PlanetaryPosition>,
    pub aspects: Vec<PlanetaryAspect>,
    pub lunar_phase: LunarPhase,
    pub sentiment: AstroSentiment,
    pub timestamp: i64,
}
