use crate::aspects::{AspectMatcher, NatalAspect};
use crate::bodies::{normalize_degrees, sign_index, sign_ruler_from_longitude, Body};
use crate::ephemeris::{BodyPositions, PositionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("expected 12 house cusps, got {count}")]
    CuspCount { count: usize },
    #[error("house cusp {house} is not a finite longitude: {value}")]
    InvalidCusp { house: usize, value: f64 },
    #[error("{system} houses need an ascendant position")]
    MissingAscendant { system: String },
    #[error("unknown house system: {0}")]
    UnknownHouseSystem(String),
    #[error("invalid natal chart: {0}")]
    Parse(String),
    #[error("could not read natal chart from {path}: {message}")]
    Io { path: String, message: String },
    #[error(transparent)]
    Position(#[from] PositionError),
}

/// Angular (1/4/7/10), succedent (2/5/8/11) or cadent (3/6/9/12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseClass {
    Angular,
    Succedent,
    Cadent,
}

impl HouseClass {
    pub const ALL: [HouseClass; 3] = [HouseClass::Angular, HouseClass::Succedent, HouseClass::Cadent];

    /// Class of a house numbered 1-12
    pub fn of_house(house: u8) -> HouseClass {
        match house % 3 {
            1 => HouseClass::Angular,
            2 => HouseClass::Succedent,
            _ => HouseClass::Cadent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HouseClass::Angular => "angular",
            HouseClass::Succedent => "succedent",
            HouseClass::Cadent => "cadent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for HouseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Twelve house cusp longitudes, house 1 first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseCusps([f64; 12]);

impl HouseCusps {
    pub fn new(cusps: &[f64]) -> Result<Self, ChartError> {
        if cusps.len() != 12 {
            return Err(ChartError::CuspCount { count: cusps.len() });
        }
        let mut out = [0.0; 12];
        for (i, value) in cusps.iter().enumerate() {
            if !value.is_finite() {
                return Err(ChartError::InvalidCusp {
                    house: i + 1,
                    value: *value,
                });
            }
            out[i] = normalize_degrees(*value);
        }
        Ok(Self(out))
    }

    /// Equal houses: 30° apart starting at the ascendant
    pub fn equal(ascendant: f64) -> Self {
        let mut out = [0.0; 12];
        for (i, cusp) in out.iter_mut().enumerate() {
            *cusp = normalize_degrees(ascendant + 30.0 * i as f64);
        }
        Self(out)
    }

    /// Whole-sign houses: house 1 is the ascendant's sign
    pub fn whole_sign(ascendant: f64) -> Self {
        let first = sign_index(ascendant) as f64 * 30.0;
        Self::equal(first)
    }

    pub fn cusp(&self, house: u8) -> Option<f64> {
        if (1..=12).contains(&house) {
            Some(self.0[(house - 1) as usize])
        } else {
            None
        }
    }

    /// House (1-12) containing a longitude.
    ///
    /// Each house spans `[cusp, next_cusp)`, wrapping through 0° when the
    /// next cusp is smaller. Falls back to house 1 when no interval matches.
    pub fn house_of(&self, longitude: f64) -> u8 {
        let lon = normalize_degrees(longitude);
        for i in 0..12 {
            let current = self.0[i];
            let next = self.0[(i + 1) % 12];
            let inside = if next < current {
                lon >= current || lon < next
            } else {
                lon >= current && lon < next
            };
            if inside {
                return (i + 1) as u8;
            }
        }
        1
    }
}

/// Natal positions plus optional house cusps
#[derive(Debug, Clone, PartialEq)]
pub struct NatalChart {
    positions: BodyPositions,
    cusps: Option<HouseCusps>,
}

/// On-disk chart: positions plus either explicit cusps or a house system
/// built from the ascendant.
#[derive(Debug, Deserialize)]
struct NatalChartFile {
    positions: BodyPositions,
    #[serde(default)]
    cusps: Option<Vec<f64>>,
    #[serde(default)]
    house_system: Option<String>,
}

impl NatalChart {
    pub fn new(positions: BodyPositions, cusps: Option<HouseCusps>) -> Self {
        Self { positions, cusps }
    }

    /// Chart without houses; every house class weighs 1.0
    pub fn from_positions(positions: BodyPositions) -> Self {
        Self::new(positions, None)
    }

    pub fn with_equal_houses(positions: BodyPositions) -> Result<Self, ChartError> {
        let asc = positions
            .get(Body::Ascendant)
            .ok_or_else(|| ChartError::MissingAscendant {
                system: "equal".to_string(),
            })?;
        Ok(Self::new(positions, Some(HouseCusps::equal(asc))))
    }

    pub fn with_whole_sign_houses(positions: BodyPositions) -> Result<Self, ChartError> {
        let asc = positions
            .get(Body::Ascendant)
            .ok_or_else(|| ChartError::MissingAscendant {
                system: "whole_sign".to_string(),
            })?;
        Ok(Self::new(positions, Some(HouseCusps::whole_sign(asc))))
    }

    pub fn from_json_str(json: &str) -> Result<Self, ChartError> {
        let file: NatalChartFile =
            serde_json::from_str(json).map_err(|e| ChartError::Parse(e.to_string()))?;

        match (file.cusps, file.house_system.as_deref()) {
            (Some(cusps), None) | (Some(cusps), Some("explicit")) => {
                Ok(Self::new(file.positions, Some(HouseCusps::new(&cusps)?)))
            }
            (Some(_), Some(other)) => Err(ChartError::Parse(format!(
                "explicit cusps conflict with house_system `{}`",
                other
            ))),
            (None, None) | (None, Some("none")) => Ok(Self::from_positions(file.positions)),
            (None, Some("equal")) => Self::with_equal_houses(file.positions),
            (None, Some("whole_sign")) => Self::with_whole_sign_houses(file.positions),
            (None, Some(other)) => Err(ChartError::UnknownHouseSystem(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ChartError> {
        let text = std::fs::read_to_string(path).map_err(|e| ChartError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    pub fn positions(&self) -> &BodyPositions {
        &self.positions
    }

    pub fn cusps(&self) -> Option<&HouseCusps> {
        self.cusps.as_ref()
    }

    pub fn ascendant(&self) -> Option<f64> {
        self.positions.get(Body::Ascendant)
    }

    /// Modern ruler of the ascendant's sign
    pub fn ascendant_ruler(&self) -> Option<Body> {
        self.ascendant().map(sign_ruler_from_longitude)
    }

    /// House (1-12) of an arbitrary longitude; `None` without cusps
    pub fn house_of(&self, longitude: f64) -> Option<u8> {
        self.cusps.as_ref().map(|c| c.house_of(longitude))
    }

    pub fn house_class_of(&self, longitude: f64) -> Option<HouseClass> {
        self.house_of(longitude).map(HouseClass::of_house)
    }

    /// House of a natal body
    pub fn body_house(&self, body: Body) -> Option<u8> {
        self.positions.get(body).and_then(|lon| self.house_of(lon))
    }

    pub fn natal_aspects(&self, matcher: &AspectMatcher) -> Vec<NatalAspect> {
        matcher.natal_aspects(&self.positions)
    }
}
