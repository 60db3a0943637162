//! Planetary cycle engine.
//!
//! Coarse periodic approximation of ecliptic longitudes: each body advances
//! linearly through its orbital period from a fixed J2000 base longitude.
//! This is intentionally not an ephemeris; the model only needs stable,
//! date-deterministic cycles. Aspect detection, lunar phase and elemental
//! sentiment are all pure functions of the wall-clock date.

use crate::config::AspectOrbs;
use crate::types::{
    AspectKind, AstroSentiment, AstroSnapshot, LunarPhase, Planet, PlanetaryAspect,
    PlanetaryPosition, SentimentBand, ZodiacSign,
};
use chrono::{DateTime, TimeZone, Utc};

// =============================================================================
// Constants
// =============================================================================

/// Reference epoch for the longitude model (J2000).
const EPOCH: (i32, u32, u32) = (2000, 1, 1);

/// First new moon after the epoch: 2000-01-06 18:14 UTC.
const NEW_MOON_EPOCH: (i32, u32, u32, u32, u32) = (2000, 1, 6, 18, 14);

/// Mean synodic month in days.
const SYNODIC_MONTH: f64 = 29.530_59;

/// Per-body (base longitude at epoch, orbital period in days).
/// Base longitudes are rounded J2000 values; periods are mean orbital periods.
const ORBITAL_ELEMENTS: [(Planet, f64, f64); 9] = [
    (Planet::Sun, 280.46, 365.25),
    (Planet::Moon, 218.32, 27.321_661),
    (Planet::Mercury, 252.25, 87.969),
    (Planet::Venus, 181.98, 224.701),
    (Planet::Mars, 355.45, 686.98),
    (Planet::Jupiter, 34.35, 4_332.59),
    (Planet::Saturn, 50.08, 10_759.22),
    (Planet::Uranus, 314.06, 30_688.5),
    (Planet::Neptune, 304.35, 60_182.0),
];

/// Elemental weight of one placement in the sentiment tally.
const PLACEMENT_WEIGHT: f64 = 1.0;

// =============================================================================
// Engine
// =============================================================================

/// Date-driven planetary cycle engine.
#[derive(Debug, Clone)]
pub struct AstroCycleEngine {
    orbs: AspectOrbs,
}

impl AstroCycleEngine {
    pub fn new(orbs: AspectOrbs) -> Self {
        Self { orbs }
    }

    /// Fractional days elapsed since the model epoch.
    fn days_since_epoch(now: DateTime<Utc>) -> f64 {
        let epoch = Utc
            .with_ymd_and_hms(EPOCH.0, EPOCH.1, EPOCH.2, 0, 0, 0)
            .unwrap();
        (now - epoch).num_seconds() as f64 / 86_400.0
    }

    /// Approximate ecliptic longitude of one body on a date.
    pub fn longitude(planet: Planet, now: DateTime<Utc>) -> f64 {
        let (_, base, period) = ORBITAL_ELEMENTS
            .iter()
            .find(|(p, _, _)| *p == planet)
            .copied()
            .expect("all bodies have orbital elements");
        let days = Self::days_since_epoch(now);
        (base + days / period * 360.0).rem_euclid(360.0)
    }

    /// Positions of all nine bodies.
    ///
    /// Retrograde is a deterministic coarse rule: a non-luminary body is
    /// flagged retrograde when its elongation from the Sun falls in the
    /// opposition window (120, 240) degrees. Sun and Moon are never
    /// retrograde.
    pub fn positions(&self, now: DateTime<Utc>) -> Vec<PlanetaryPosition> {
        let sun_longitude = Self::longitude(Planet::Sun, now);
        Planet::all()
            .iter()
            .map(|&planet| {
                let longitude = Self::longitude(planet, now);
                let elongation = (longitude - sun_longitude).rem_euclid(360.0);
                let retrograde =
                    !planet.is_luminary() && elongation > 120.0 && elongation < 240.0;
                PlanetaryPosition {
                    planet,
                    longitude,
                    sign: ZodiacSign::from_longitude(longitude),
                    retrograde,
                }
            })
            .collect()
    }

    /// Angular separation of two longitudes, normalized to [0, 180].
    pub fn angular_separation(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        if d > 180.0 {
            360.0 - d
        } else {
            d
        }
    }

    /// Detect aspects across every unordered pair of bodies.
    ///
    /// A pair yields at most one aspect: when the separation falls inside
    /// more than one template's orb, only the closest match is kept. An empty
    /// result is a normal outcome for quiet dates.
    pub fn aspects(&self, positions: &[PlanetaryPosition]) -> Vec<PlanetaryAspect> {
        let mut aspects = Vec::new();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let a = &positions[i];
                let b = &positions[j];
                let separation = Self::angular_separation(a.longitude, b.longitude);

                let best = AspectKind::all()
                    .iter()
                    .filter_map(|&kind| {
                        let orb = (separation - kind.target_angle()).abs();
                        (orb <= self.orbs.for_kind(kind)).then_some((kind, orb))
                    })
                    .min_by(|x, y| x.1.partial_cmp(&y.1).unwrap_or(std::cmp::Ordering::Equal));

                if let Some((kind, orb)) = best {
                    aspects.push(PlanetaryAspect {
                        planet1: a.planet,
                        planet2: b.planet,
                        kind,
                        angle: separation,
                        orb,
                        influence: kind.influence(),
                    });
                }
            }
        }
        aspects
    }

    /// Lunar phase from the synodic cycle position.
    pub fn lunar_phase(now: DateTime<Utc>) -> LunarPhase {
        let new_moon = Utc
            .with_ymd_and_hms(
                NEW_MOON_EPOCH.0,
                NEW_MOON_EPOCH.1,
                NEW_MOON_EPOCH.2,
                NEW_MOON_EPOCH.3,
                NEW_MOON_EPOCH.4,
                0,
            )
            .unwrap();
        let days = (now - new_moon).num_seconds() as f64 / 86_400.0;
        let fraction = days.rem_euclid(SYNODIC_MONTH) / SYNODIC_MONTH;
        LunarPhase::from_fraction(fraction)
    }

    /// Elemental sentiment over all placements.
    ///
    /// Fire and air placements add bullish weight, earth and water bearish.
    /// A retrograde placement contributes half its weight to the opposite
    /// side. Score is the bullish share of total weight, 0-100.
    pub fn sentiment(&self, positions: &[PlanetaryPosition]) -> AstroSentiment {
        let mut bullish = 0.0;
        let mut bearish = 0.0;

        for position in positions {
            let leans_bullish = position.sign.element().is_bullish();
            let (weight, inverted) = if position.retrograde {
                (PLACEMENT_WEIGHT / 2.0, true)
            } else {
                (PLACEMENT_WEIGHT, false)
            };
            if leans_bullish != inverted {
                bullish += weight;
            } else {
                bearish += weight;
            }
        }

        let total = bullish + bearish;
        let score = if total > 0.0 {
            bullish / total * 100.0
        } else {
            50.0
        };

        AstroSentiment {
            score,
            band: SentimentBand::from_score(score),
            bullish_weight: bullish,
            bearish_weight: bearish,
        }
    }

    /// Full astro reading for one date.
    pub fn snapshot(&self, now: DateTime<Utc>) -> AstroSnapshot {
        let positions = self.positions(now);
        let aspects = self.aspects(&positions);
        let sentiment = self.sentiment(&positions);
        AstroSnapshot {
            positions,
            aspects,
            lunar_phase: Self::lunar_phase(now),
            sentiment,
            timestamp: now.timestamp_millis(),
        }
    }

    /// Confidence the fusion layer attributes to this reading: the
    /// extremity of the sentiment score, 0-100.
    pub fn confidence(sentiment: &AstroSentiment) -> f64 {
        ((sentiment.score - 50.0).abs() * 2.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AstroCycleEngine {
        AstroCycleEngine::new(AspectOrbs::default())
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn position(planet: Planet, longitude: f64) -> PlanetaryPosition {
        PlanetaryPosition {
            planet,
            longitude,
            sign: ZodiacSign::from_longitude(longitude),
            retrograde: false,
        }
    }

    #[test]
    fn test_longitude_in_range() {
        for planet in Planet::all() {
            let lon = AstroCycleEngine::longitude(planet, date(2026, 8, 7));
            assert!((0.0..360.0).contains(&lon), "{:?} -> {}", planet, lon);
        }
    }

    #[test]
    fn test_longitude_at_epoch_equals_base() {
        let lon = AstroCycleEngine::longitude(Planet::Sun, date(2000, 1, 1));
        assert!((lon - 280.46).abs() < 1e-9);
    }

    #[test]
    fn test_longitude_full_period_wraps() {
        // One Venus period later the longitude returns to its base.
        let start = date(2000, 1, 1);
        let later = start + chrono::Duration::seconds((224.701 * 86_400.0) as i64);
        let lon = AstroCycleEngine::longitude(Planet::Venus, later);
        assert!((lon - 181.98).abs() < 0.1, "got {}", lon);
    }

    #[test]
    fn test_angular_separation_normalization() {
        assert_eq!(AstroCycleEngine::angular_separation(10.0, 350.0), 20.0);
        assert_eq!(AstroCycleEngine::angular_separation(0.0, 180.0), 180.0);
        assert_eq!(AstroCycleEngine::angular_separation(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_exact_trine_has_zero_orb() {
        let positions = vec![
            position(Planet::Venus, 10.0),
            position(Planet::Mars, 130.0),
        ];
        let aspects = engine().aspects(&positions);
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].kind, AspectKind::Trine);
        assert_eq!(aspects[0].orb, 0.0);
        assert_eq!(aspects[0].angle, 120.0);
    }

    #[test]
    fn test_no_aspect_outside_orbs() {
        let positions = vec![
            position(Planet::Venus, 0.0),
            position(Planet::Mars, 37.0),
        ];
        // 37 degrees is outside every template orb.
        assert!(engine().aspects(&positions).is_empty());
    }

    #[test]
    fn test_one_aspect_per_pair() {
        let positions = engine().positions(date(2026, 8, 7));
        let aspects = engine().aspects(&positions);
        let mut seen = std::collections::HashSet::new();
        for aspect in &aspects {
            assert!(seen.insert((aspect.planet1, aspect.planet2)));
        }
    }

    #[test]
    fn test_luminaries_never_retrograde() {
        // Sweep a year of dates; Sun and Moon must never flag retrograde.
        for day in 0..365 {
            let now = date(2026, 1, 1) + chrono::Duration::days(day);
            for position in engine().positions(now) {
                if position.planet.is_luminary() {
                    assert!(!position.retrograde);
                }
            }
        }
    }

    #[test]
    fn test_lunar_phase_at_new_moon_epoch() {
        let new_moon = Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0).unwrap();
        assert_eq!(AstroCycleEngine::lunar_phase(new_moon), LunarPhase::NewMoon);
        // Just past half a synodic month: full moon.
        let full = new_moon
            + chrono::Duration::seconds((SYNODIC_MONTH / 2.0 * 86_400.0) as i64 + 3_600);
        assert_eq!(AstroCycleEngine::lunar_phase(full), LunarPhase::FullMoon);
    }

    #[test]
    fn test_sentiment_all_fire_is_strong_bullish() {
        let positions: Vec<PlanetaryPosition> = Planet::all()
            .iter()
            .map(|&p| position(p, 5.0)) // Aries, fire
            .collect();
        let sentiment = engine().sentiment(&positions);
        assert_eq!(sentiment.score, 100.0);
        assert_eq!(sentiment.band, SentimentBand::StrongBullish);
        assert_eq!(sentiment.bearish_weight, 0.0);
    }

    #[test]
    fn test_retrograde_halves_and_inverts() {
        let mut placement = position(Planet::Mars, 5.0); // fire, bullish
        placement.retrograde = true;
        let sentiment = engine().sentiment(&[placement]);
        // Inverted to bearish at half weight
        assert_eq!(sentiment.bullish_weight, 0.0);
        assert_eq!(sentiment.bearish_weight, 0.5);
        assert_eq!(sentiment.score, 0.0);
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let now = date(2026, 8, 7);
        let a = engine().snapshot(now);
        let b = engine().snapshot(now);
        assert_eq!(a.sentiment.score, b.sentiment.score);
        assert_eq!(a.aspects.len(), b.aspects.len());
        assert_eq!(a.lunar_phase, b.lunar_phase);
    }
}
