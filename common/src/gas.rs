use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// The closed set of gases reported by the sensor board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GasId {
    Co,
    Co2,
    So2,
    Ch4,
    Butane,
    Lpg,
    Smoke,
}

impl GasId {
    pub const COUNT: usize = 7;

    pub const ALL: [GasId; GasId::COUNT] = [
        GasId::Co,
        GasId::Co2,
        GasId::So2,
        GasId::Ch4,
        GasId::Butane,
        GasId::Lpg,
        GasId::Smoke,
    ];

    /// Wire identifier, also used as CSS class and DOM id prefix.
    pub fn key(&self) -> &'static str {
        match self {
            GasId::Co => "co",
            GasId::Co2 => "co2",
            GasId::So2 => "so2",
            GasId::Ch4 => "ch4",
            GasId::Butane => "butane",
            GasId::Lpg => "lpg",
            GasId::Smoke => "smoke",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GasId::Co => "CO",
            GasId::Co2 => "CO₂",
            GasId::So2 => "SO₂",
            GasId::Ch4 => "CH₄",
            GasId::Butane => "C₄H₁₀",
            GasId::Lpg => "LPG",
            GasId::Smoke => "Smoke",
        }
    }

    /// Line colour in history charts.
    pub fn color(&self) -> &'static str {
        match self {
            GasId::Co => "#ff4444",
            GasId::Co2 => "#00C851",
            GasId::So2 => "#ffbb33",
            GasId::Ch4 => "#33b5e5",
            GasId::Butane => "#2BBBAD",
            GasId::Lpg => "#4285F4",
            GasId::Smoke => "#aa66cc",
        }
    }
}

impl fmt::Display for GasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GasId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GasId::ALL
            .into_iter()
            .find(|gas| gas.key() == s)
            .ok_or_else(|| Error::UnknownGas(s.to_owned()))
    }
}

/// Maximum expected concentration per gas (ppm). Used as the denominator
/// when normalizing readings into percentages and tiers.
///
/// Built once and never mutated afterwards; hand it to a
/// [`Classifier`](crate::Classifier) by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    max: [f64; GasId::COUNT],
}

impl ThresholdTable {
    pub fn max_value(&self, gas: GasId) -> f64 {
        self.max[gas as usize]
    }

    /// Returns a copy of the table with the maximum of `gas` replaced.
    pub fn with_max(mut self, gas: GasId, value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidThreshold { gas, value });
        }
        self.max[gas as usize] = value;
        Ok(self)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let mut max = [0.0; GasId::COUNT];
        max[GasId::Co as usize] = 50.0;
        max[GasId::Co2 as usize] = 5000.0;
        max[GasId::So2 as usize] = 5.0;
        max[GasId::Ch4 as usize] = 1000.0;
        max[GasId::Butane as usize] = 800.0;
        max[GasId::Lpg as usize] = 1000.0;
        max[GasId::Smoke as usize] = 300.0;
        Self { max }
    }
}
