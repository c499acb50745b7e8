//! The fixed fee-tier table pools are discovered across.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four standard concentrated-liquidity fee tiers.
///
/// The discriminant is the value the factory is keyed by (`getPool(a, b, fee)`)
/// and the value charged on the input by the swap math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum FeeTier {
    /// 100, stable pairs.
    Lowest = 100,
    /// 500
    Low = 500,
    /// 3000, the default for most volatile pairs.
    Medium = 3000,
    /// 10000, exotic pairs.
    High = 10000,
}

impl FeeTier {
    /// Every tier, in the order pool selection evaluates them.
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    #[inline]
    pub const fn value(self) -> u32 {
        self as u32
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> Self {
        tier.value()
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            100 => Ok(FeeTier::Lowest),
            500 => Ok(FeeTier::Low),
            3000 => Ok(FeeTier::Medium),
            10000 => Ok(FeeTier::High),
            other => Err(ConfigError::InvalidFeeTier(other)),
        }
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
