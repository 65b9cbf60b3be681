use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Shape of the strength curve between exact (delta 0) and the effective orb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FalloffMode {
    Linear,
    Gaussian,
    #[default]
    Cosine,
}

impl FalloffMode {
    pub const ALL: [FalloffMode; 3] = [FalloffMode::Linear, FalloffMode::Gaussian, FalloffMode::Cosine];

    pub fn as_str(&self) -> &'static str {
        match self {
            FalloffMode::Linear => "linear",
            FalloffMode::Gaussian => "gaussian",
            FalloffMode::Cosine => "cosine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for FalloffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Falloff {
    pub mode: FalloffMode,
    pub power: f64,
    /// Gaussian width in degrees; half the orb when unset
    pub sigma: Option<f64>,
}

impl Default for Falloff {
    fn default() -> Self {
        Self {
            mode: FalloffMode::Cosine,
            power: 1.0,
            sigma: None,
        }
    }
}

impl Falloff {
    pub fn new(mode: FalloffMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Strength in [0, 1] for an angular distance `delta` inside `orb`.
    ///
    /// Returns 0 for a non-positive orb.
    pub fn value(&self, delta: f64, orb: f64) -> f64 {
        if orb <= 0.0 {
            return 0.0;
        }
        let delta = delta.abs();
        let x = (delta / orb).clamp(0.0, 1.0);
        let v = match self.mode {
            FalloffMode::Linear => 1.0 - x,
            FalloffMode::Gaussian => {
                let sigma = match self.sigma {
                    Some(s) if s > 0.0 => s,
                    _ => orb / 2.0,
                };
                (-0.5 * (delta / sigma).powi(2)).exp()
            }
            FalloffMode::Cosine => (FRAC_PI_2 * x).cos().max(0.0),
        };
        let v = v.clamp(0.0, 1.0);
        if self.power != 1.0 {
            v.powf(self.power)
        } else {
            v
        }
    }
}
