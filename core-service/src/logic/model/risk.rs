//! Risk tiers derived from attrition probability

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
            RiskTier::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tiering profile. One scheme is active per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskScheme {
    /// Very High >= 0.8, High >= 0.6, Medium >= 0.4, else Low
    #[default]
    FourTier,
    /// High >= 0.7, Medium >= 0.4, else Low
    ThreeTier,
}

impl RiskScheme {
    /// (lower bound, tier), highest first; bounds are inclusive
    pub fn cutoffs(&self) -> &'static [(f64, RiskTier)] {
        match self {
            RiskScheme::FourTier => &[
                (0.8, RiskTier::VeryHigh),
                (0.6, RiskTier::High),
                (0.4, RiskTier::Medium),
            ],
            RiskScheme::ThreeTier => &[(0.7, RiskTier::High), (0.4, RiskTier::Medium)],
        }
    }

    pub fn tier(&self, probability: f64) -> RiskTier {
        self.cutoffs()
            .iter()
            .find(|(bound, _)| probability >= *bound)
            .map(|(_, tier)| *tier)
            .unwrap_or(RiskTier::Low)
    }
}

impl FromStr for RiskScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "four_tier" | "4" | "four" => Ok(RiskScheme::FourTier),
            "three_tier" | "3" | "three" => Ok(RiskScheme::ThreeTier),
            other => Err(format!("unknown risk scheme: {}", other)),
        }
    }
}
