use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reporting horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Scope::Daily, Scope::Weekly, Scope::Monthly, Scope::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Daily => "daily",
            Scope::Weekly => "weekly",
            Scope::Monthly => "monthly",
            Scope::Yearly => "yearly",
        }
    }

    /// Horizon window used when a profile does not set `horizon_days`
    pub fn default_horizon_days(&self) -> u32 {
        match self {
            Scope::Daily => 1,
            Scope::Weekly => 7,
            Scope::Monthly => 31,
            Scope::Yearly => 365,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .iter()
            .copied()
            .find(|scope| scope.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown scope: {}", s))
    }
}

/// Service level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 2] = [Tier::Free, Tier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Premium => "premium",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .iter()
            .copied()
            .find(|tier| tier.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown tier: {}", s))
    }
}
