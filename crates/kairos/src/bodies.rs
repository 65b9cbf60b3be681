//! Celestial bodies, their groups, zodiac signs and sign rulers.
//!
//! Bodies are a closed set. Names coming from config files or position
//! tables are parsed once through [`Body::from_str`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Ascendant,
    Midheaven,
    Node,
    Lilith,
}

/// Ordered set of bodies, iteration follows [`Body::ALL`] order.
pub type BodySet = BTreeSet<Body>;

impl Body {
    pub const ALL: [Body; 14] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Ascendant,
        Body::Midheaven,
        Body::Node,
        Body::Lilith,
    ];

    /// The ten classical and modern planets.
    pub const PLANETS: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::Ascendant => "ascendant",
            Body::Midheaven => "midheaven",
            Body::Node => "node",
            Body::Lilith => "lilith",
        }
    }

    pub fn group(&self) -> BodyGroup {
        match self {
            Body::Sun | Body::Moon => BodyGroup::Luminaries,
            Body::Mercury | Body::Venus | Body::Mars => BodyGroup::Personal,
            Body::Jupiter | Body::Saturn => BodyGroup::Social,
            Body::Uranus | Body::Neptune | Body::Pluto => BodyGroup::Generational,
            Body::Ascendant | Body::Midheaven => BodyGroup::Angles,
            Body::Node | Body::Lilith => BodyGroup::Points,
        }
    }

    /// Default body set for transit and natal matching.
    ///
    /// Planets are always present, the node and Lilith are optional and the
    /// ascendant is only meaningful on the natal side.
    pub fn default_set(include_node: bool, include_lilith: bool, include_angles: bool) -> BodySet {
        let mut set: BodySet = Body::PLANETS.iter().copied().collect();
        if include_node {
            set.insert(Body::Node);
        }
        if include_lilith {
            set.insert(Body::Lilith);
        }
        if include_angles {
            set.insert(Body::Ascendant);
            set.insert(Body::Midheaven);
        }
        set
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBody(pub String);

impl fmt::Display for UnknownBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown body: {}", self.0)
    }
}

impl std::error::Error for UnknownBody {}

impl FromStr for Body {
    type Err = UnknownBody;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = match s.trim().to_lowercase().as_str() {
            "sun" => Body::Sun,
            "moon" => Body::Moon,
            "mercury" => Body::Mercury,
            "venus" => Body::Venus,
            "mars" => Body::Mars,
            "jupiter" => Body::Jupiter,
            "saturn" => Body::Saturn,
            "uranus" => Body::Uranus,
            "neptune" => Body::Neptune,
            "pluto" => Body::Pluto,
            "ascendant" | "asc" => Body::Ascendant,
            "midheaven" | "mc" => Body::Midheaven,
            "node" | "north_node" | "true_node" | "mean_node" => Body::Node,
            "lilith" | "black_moon" | "mean_lilith" => Body::Lilith,
            other => return Err(UnknownBody(other.to_string())),
        };
        Ok(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyGroup {
    Luminaries,
    Personal,
    Social,
    Generational,
    Angles,
    Points,
}

impl BodyGroup {
    pub const ALL: [BodyGroup; 6] = [
        BodyGroup::Luminaries,
        BodyGroup::Personal,
        BodyGroup::Social,
        BodyGroup::Generational,
        BodyGroup::Angles,
        BodyGroup::Points,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyGroup::Luminaries => "luminaries",
            BodyGroup::Personal => "personal",
            BodyGroup::Social => "social",
            BodyGroup::Generational => "generational",
            BodyGroup::Angles => "angles",
            BodyGroup::Points => "points",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        BodyGroup::ALL.iter().copied().find(|g| g.as_str() == s)
    }
}

/// Get sign index (0-11) from longitude
pub fn sign_index(longitude: f64) -> u8 {
    let normalized = normalize_degrees(longitude);
    ((normalized / 30.0) as u8).min(11)
}

/// Modern sign rulers (outer planets rule Scorpio, Aquarius and Pisces).
pub fn sign_ruler(sign_index: u8) -> Body {
    const MODERN_RULERS: [Body; 12] = [
        Body::Mars,    // Aries
        Body::Venus,   // Taurus
        Body::Mercury, // Gemini
        Body::Moon,    // Cancer
        Body::Sun,     // Leo
        Body::Mercury, // Virgo
        Body::Venus,   // Libra
        Body::Pluto,   // Scorpio
        Body::Jupiter, // Sagittarius
        Body::Saturn,  // Capricorn
        Body::Uranus,  // Aquarius
        Body::Neptune, // Pisces
    ];
    MODERN_RULERS[(sign_index % 12) as usize]
}

pub fn sign_ruler_from_longitude(longitude: f64) -> Body {
    sign_ruler(sign_index(longitude))
}

/// Normalize an angle to [0, 360).
pub fn normalize_degrees(value: f64) -> f64 {
    let v = value.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if v >= 360.0 {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("ASC".parse::<Body>().unwrap(), Body::Ascendant);
        assert_eq!("north_node".parse::<Body>().unwrap(), Body::Node);
        assert_eq!(" Saturn ".parse::<Body>().unwrap(), Body::Saturn);
        assert!("vulcan".parse::<Body>().is_err());
    }

    #[test]
    fn test_groups() {
        assert_eq!(Body::Moon.group(), BodyGroup::Luminaries);
        assert_eq!(Body::Midheaven.group(), BodyGroup::Angles);
        assert_eq!(Body::Lilith.group(), BodyGroup::Points);
        assert_eq!(BodyGroup::parse("social"), Some(BodyGroup::Social));
    }

    #[test]
    fn test_sign_ruler_modern() {
        assert_eq!(sign_ruler(0), Body::Mars);      // Aries
        assert_eq!(sign_ruler(7), Body::Pluto);     // Scorpio
        assert_eq!(sign_ruler(10), Body::Uranus);   // Aquarius
        assert_eq!(sign_ruler_from_longitude(135.0), Body::Sun); // Leo
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert_eq!(normalize_degrees(-1e-18), 0.0);
        assert_eq!(sign_index(359.999), 11);
    }
}
