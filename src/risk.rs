//! Landslide risk classification.
//!
//! Risk only exists when the detector sees rain *and* the soil is wet; the rain
//! percentage then picks the band. Bands are checked from the top down and
//! every comparison is inclusive, so a value sitting on a boundary lands in the
//! higher band.

use crate::preferences::Thresholds;
use crate::sensors::{RainDetection, SensorReading, SoilStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RiskLevel {
    None,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::None,
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
    ];

    /// Text printed on the telemetry output for this level
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::None => "No chance of landslide",
            RiskLevel::Low => "Low chance of landslide",
            RiskLevel::Moderate => "Moderate chance of landslide",
            RiskLevel::High => "High chance of landslide",
        }
    }
}

impl Thresholds {
    /// Classifies a reading against this set of thresholds
    /// param reading: rain percentage must already be within 0 - 100
    pub fn classify(&self, reading: &SensorReading) -> RiskLevel {
        if reading.rain_detected != RainDetection::Detected
            || reading.soil_status != SoilStatus::Wet
        {
            return RiskLevel::None;
        }

        if reading.rain_percentage >= self.moderate_landslide {
            RiskLevel::High
        } else if reading.rain_percentage >= self.low_landslide {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Classifies a reading with the built-in thresholds
pub fn classify(reading: &SensorReading) -> RiskLevel {
    Thresholds::DEFAULT.classify(reading)
}
