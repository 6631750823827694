use crate::{
    error::{Error, Result},
    gas::GasId,
};

/// One sample of the sensor board. Every gas is optional, a partial update
/// only carries the gases that changed.
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GasReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>, // ms since epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>, // ppm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2: Option<f64>, // ppm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub so2: Option<f64>, // ppm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ch4: Option<f64>, // ppm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub butane: Option<f64>, // ppm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lpg: Option<f64>, // ppm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoke: Option<f64>, // ppm
}

impl GasReading {
    pub fn get(&self, gas: GasId) -> Option<f64> {
        match gas {
            GasId::Co => self.co,
            GasId::Co2 => self.co2,
            GasId::So2 => self.so2,
            GasId::Ch4 => self.ch4,
            GasId::Butane => self.butane,
            GasId::Lpg => self.lpg,
            GasId::Smoke => self.smoke,
        }
    }

    pub fn set(&mut self, gas: GasId, value: Option<f64>) {
        let slot = match gas {
            GasId::Co => &mut self.co,
            GasId::Co2 => &mut self.co2,
            GasId::So2 => &mut self.so2,
            GasId::Ch4 => &mut self.ch4,
            GasId::Butane => &mut self.butane,
            GasId::Lpg => &mut self.lpg,
            GasId::Smoke => &mut self.smoke,
        };
        *slot = value;
    }

    pub fn with(mut self, gas: GasId, value: f64) -> Self {
        self.set(gas, Some(value));
        self
    }

    /// Present gases in `GasId::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (GasId, f64)> + '_ {
        GasId::ALL
            .into_iter()
            .filter_map(|gas| self.get(gas).map(|value| (gas, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Concentrations must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (gas, value) in self.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConcentration { gas, value });
            }
        }
        Ok(())
    }
}
