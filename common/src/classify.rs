use std::fmt;

use crate::{
    gas::{GasId, ThresholdTable},
    reading::GasReading,
};

/// Lower bound (inclusive) of the warning tier, as a fraction of the maximum.
pub const WARNING_RATIO: f64 = 0.5;
/// Lower bound (inclusive) of the danger tier, as a fraction of the maximum.
pub const DANGER_RATIO: f64 = 0.8;

/// Safety classification of a concentration, ordered by severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum SafetyTier {
    Safe,
    Warning,
    Danger,
}

impl SafetyTier {
    pub fn label(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "Safe",
            SafetyTier::Warning => "Warning",
            SafetyTier::Danger => "Danger",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "safe",
            SafetyTier::Warning => "warning",
            SafetyTier::Danger => "danger",
        }
    }
}

impl fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classified view of one gas in a reading, what a gauge needs to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasLevel {
    pub gas: GasId,
    pub value: f64,      // ppm
    pub percentage: f64, // of the threshold maximum, not clamped
    pub tier: SafetyTier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Classifier {
    thresholds: ThresholdTable,
}

impl Classifier {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn classify(&self, gas: GasId, value: f64) -> SafetyTier {
        let ratio = value / self.thresholds.max_value(gas);
        if ratio < WARNING_RATIO {
            SafetyTier::Safe
        } else if ratio < DANGER_RATIO {
            SafetyTier::Warning
        } else {
            SafetyTier::Danger
        }
    }

    pub fn percentage(&self, gas: GasId, value: f64) -> f64 {
        100.0 * value / self.thresholds.max_value(gas)
    }

    pub fn level(&self, gas: GasId, value: f64) -> GasLevel {
        GasLevel {
            gas,
            value,
            percentage: self.percentage(gas, value),
            tier: self.classify(gas, value),
        }
    }

    /// One level per gas present in the reading. Absent gases are skipped.
    pub fn assess<'a>(&'a self, reading: &'a GasReading) -> impl Iterator<Item = GasLevel> + 'a {
        reading.iter().map(|(gas, value)| self.level(gas, value))
    }

    /// Most severe tier of the reading, `None` when no gas is present.
    pub fn worst(&self, reading: &GasReading) -> Option<SafetyTier> {
        self.assess(reading).map(|level| level.tier).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::default()
    }

    #[test]
    fn tiers_follow_ratio_ranges() {
        let c = classifier();
        for gas in GasId::ALL {
            let max = c.thresholds().max_value(gas);
            for ratio in [0.0, 0.1, 0.25, 0.49, 0.4999] {
                assert_eq!(c.classify(gas, max * ratio), SafetyTier::Safe, "{gas} {ratio}");
            }
            for ratio in [0.5, 0.6, 0.75, 0.79] {
                assert_eq!(c.classify(gas, max * ratio), SafetyTier::Warning, "{gas} {ratio}");
            }
            for ratio in [0.8, 0.9, 1.0, 2.5] {
                assert_eq!(c.classify(gas, max * ratio), SafetyTier::Danger, "{gas} {ratio}");
            }
        }
    }

    #[test]
    fn boundaries_belong_to_higher_tier() {
        let c = classifier();
        assert_eq!(c.classify(GasId::Co, 25.0), SafetyTier::Warning);
        assert_eq!(c.classify(GasId::Co, 24.999), SafetyTier::Safe);
        assert_eq!(c.classify(GasId::Co, 40.0), SafetyTier::Danger);
        assert_eq!(c.classify(GasId::Co, 39.999), SafetyTier::Warning);
        assert_eq!(c.classify(GasId::Co, 0.0), SafetyTier::Safe);
    }

    #[test]
    fn so2_scenario() {
        let c = classifier();
        assert_eq!(c.classify(GasId::So2, 2.0), SafetyTier::Safe);
        assert_eq!(c.classify(GasId::So2, 3.0), SafetyTier::Warning);
        assert_eq!(c.classify(GasId::So2, 4.5), SafetyTier::Danger);
    }

    #[test]
    fn classification_is_monotonic() {
        let c = classifier();
        for gas in GasId::ALL {
            let max = c.thresholds().max_value(gas);
            let mut previous = SafetyTier::Safe;
            for step in 0..=300 {
                let tier = c.classify(gas, max * step as f64 / 200.0);
                assert!(tier >= previous, "{gas} at step {step}");
                previous = tier;
            }
        }
    }

    #[test]
    fn percentage_is_not_clamped() {
        let c = classifier();
        assert_eq!(c.percentage(GasId::Co, 25.0), 50.0);
        assert_eq!(c.percentage(GasId::Smoke, 600.0), 200.0);
        assert_eq!(c.percentage(GasId::Co2, 0.0), 0.0);
    }

    #[test]
    fn injected_thresholds_are_used() {
        let table = ThresholdTable::default().with_max(GasId::Co, 100.0).unwrap();
        let c = Classifier::new(table);
        assert_eq!(c.classify(GasId::Co, 40.0), SafetyTier::Safe);
        assert_eq!(c.classify(GasId::Co, 80.0), SafetyTier::Danger);
    }

    #[test]
    fn assess_skips_absent_gases() {
        let c = classifier();
        let reading = GasReading::default()
            .with(GasId::Co, 10.0)
            .with(GasId::Smoke, 270.0);

        let levels: Vec<_> = c.assess(&reading).collect();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].gas, GasId::Co);
        assert_eq!(levels[0].tier, SafetyTier::Safe);
        assert_eq!(levels[0].percentage, 20.0);
        assert_eq!(levels[1].gas, GasId::Smoke);
        assert_eq!(levels[1].tier, SafetyTier::Danger);

        assert_eq!(c.worst(&reading), Some(SafetyTier::Danger));
        assert_eq!(c.worst(&GasReading::default()), None);
    }

    #[test]
    fn tier_ordering() {
        assert!(SafetyTier::Safe < SafetyTier::Warning);
        assert!(SafetyTier::Warning < SafetyTier::Danger);
        assert_eq!(SafetyTier::Warning.to_string(), "Warning");
        assert_eq!(SafetyTier::Danger.css_class(), "danger");
    }
}
