use crate::bodies::{normalize_degrees, Body, BodySet};
use crate::ephemeris::provider::PositionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validated body longitudes, each normalized to [0, 360).
///
/// This is the only shape position data takes inside the engine; raw
/// provider output is checked once in [`BodyPositions::from_raw`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct BodyPositions(BTreeMap<Body, f64>);

impl BodyPositions {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build from raw `(name, longitude)` pairs, rejecting unknown names and
    /// non-finite values.
    pub fn from_raw<I, S>(raw: I) -> Result<Self, PositionError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut positions = Self::new();
        for (name, lon) in raw {
            let body: Body = name
                .as_ref()
                .parse()
                .map_err(|_| PositionError::UnknownBody {
                    name: name.as_ref().to_string(),
                })?;
            positions.try_insert(body, lon)?;
        }
        Ok(positions)
    }

    /// Insert a longitude, normalizing it. Non-finite values are rejected.
    pub fn try_insert(&mut self, body: Body, longitude: f64) -> Result<(), PositionError> {
        if !longitude.is_finite() {
            return Err(PositionError::InvalidLongitude {
                body: body.to_string(),
                value: longitude,
            });
        }
        self.0.insert(body, normalize_degrees(longitude));
        Ok(())
    }

    pub fn get(&self, body: Body) -> Option<f64> {
        self.0.get(&body).copied()
    }

    pub fn contains(&self, body: Body) -> bool {
        self.0.contains_key(&body)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Body, f64)> + '_ {
        self.0.iter().map(|(b, lon)| (*b, *lon))
    }

    pub fn bodies(&self) -> BodySet {
        self.0.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep only the given bodies
    pub fn restricted_to(&self, bodies: &BodySet) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(b, _)| bodies.contains(b))
                .map(|(b, lon)| (*b, *lon))
                .collect(),
        )
    }
}

impl TryFrom<BTreeMap<String, f64>> for BodyPositions {
    type Error = PositionError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}
