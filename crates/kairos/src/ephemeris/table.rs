//! Offline position provider backed by a daily ephemeris table.

use crate::bodies::{normalize_degrees, BodySet};
use crate::ephemeris::provider::{PositionError, PositionProvider};
use crate::ephemeris::types::BodyPositions;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
struct TableRow {
    date: NaiveDate,
    positions: BodyPositions,
}

#[derive(Debug, Clone, Deserialize)]
struct TableFile {
    rows: Vec<TableRow>,
}

/// Daily rows of longitudes at 00:00 UTC.
///
/// Positions between two rows are interpolated linearly along the shorter
/// arc, so a body crossing 0° Aries does not sweep back across the zodiac.
#[derive(Debug, Clone, Default)]
pub struct TablePositionProvider {
    rows: BTreeMap<NaiveDate, BodyPositions>,
}

impl TablePositionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(mut self, date: NaiveDate, positions: BodyPositions) -> Self {
        self.rows.insert(date, positions);
        self
    }

    /// Parse `{"rows": [{"date": "YYYY-MM-DD", "positions": {"sun": 280.1, ...}}]}`
    pub fn from_json_str(json: &str) -> Result<Self, PositionError> {
        let file: TableFile =
            serde_json::from_str(json).map_err(|e| PositionError::InvalidTable {
                message: e.to_string(),
            })?;
        if file.rows.is_empty() {
            return Err(PositionError::InvalidTable {
                message: "table has no rows".to_string(),
            });
        }
        let mut rows = BTreeMap::new();
        for row in file.rows {
            if rows.insert(row.date, row.positions).is_some() {
                return Err(PositionError::InvalidTable {
                    message: format!("duplicate row for {}", row.date),
                });
            }
        }
        Ok(Self { rows })
    }

    pub fn from_path(path: &Path) -> Result<Self, PositionError> {
        let text = std::fs::read_to_string(path).map_err(|e| PositionError::InvalidTable {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json_str(&text)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Interpolated positions at `at`, restricted to `bodies`.
    pub fn positions_at(
        &self,
        at: DateTime<Utc>,
        bodies: &BodySet,
    ) -> Result<BodyPositions, PositionError> {
        let date = at.date_naive();
        let start = self
            .rows
            .get(&date)
            .ok_or(PositionError::UnsupportedDate { datetime: at })?;
        // Last day in the table: no interpolation towards the next day
        let end = date
            .succ_opt()
            .and_then(|next| self.rows.get(&next))
            .unwrap_or(start);

        let frac = f64::from(at.num_seconds_from_midnight()) / 86_400.0;

        let mut out = BodyPositions::new();
        for (body, lon0) in start.iter() {
            if !bodies.contains(&body) {
                continue;
            }
            let lon1 = end.get(body).unwrap_or(lon0);
            out.try_insert(body, interpolate_longitude(lon0, lon1, frac))?;
        }
        Ok(out)
    }
}

/// Linear interpolation along the shorter arc between two longitudes
pub fn interpolate_longitude(lon0: f64, lon1: f64, frac: f64) -> f64 {
    let step = (lon1 - lon0 + 540.0).rem_euclid(360.0) - 180.0;
    normalize_degrees(lon0 + step * frac)
}

#[async_trait]
impl PositionProvider for TablePositionProvider {
    fn name(&self) -> &str {
        "table"
    }

    async fn get_positions(
        &self,
        at: DateTime<Utc>,
        bodies: &BodySet,
    ) -> Result<BodyPositions, PositionError> {
        self.positions_at(at, bodies)
    }
}
