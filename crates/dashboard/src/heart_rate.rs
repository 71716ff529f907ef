//! Heart-rate training zones.

use serde::Serialize;

use crate::color::{self, Color};
use crate::models::QuantitySample;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartRateZone {
    pub zone_number: u8,
    /// Inclusive lower bound in bpm, open below when `None`.
    pub min_heart_rate: Option<f64>,
    /// Inclusive upper bound in bpm, open above when `None`.
    pub max_heart_rate: Option<f64>,
    pub color: Color,
}

pub const ZONES: [HeartRateZone; 5] = [
    HeartRateZone::new(1, None, Some(128.0), color::ZONE_1),
    HeartRateZone::new(2, Some(129.0), Some(141.0), color::ZONE_2),
    HeartRateZone::new(3, Some(142.0), Some(153.0), color::ZONE_3),
    HeartRateZone::new(4, Some(154.0), Some(165.0), color::ZONE_4),
    HeartRateZone::new(5, Some(166.0), None, color::ZONE_5),
];

impl HeartRateZone {
    pub const fn new(
        zone_number: u8,
        min_heart_rate: Option<f64>,
        max_heart_rate: Option<f64>,
        color: Color,
    ) -> Self {
        Self {
            zone_number,
            min_heart_rate,
            max_heart_rate,
            color,
        }
    }

    pub fn contains(&self, heart_rate: f64) -> bool {
        match (self.min_heart_rate, self.max_heart_rate) {
            (Some(min), Some(max)) => min <= heart_rate && heart_rate <= max,
            (Some(min), None) => min <= heart_rate,
            (None, Some(max)) => heart_rate <= max,
            (None, None) => false,
        }
    }

    pub fn label(&self) -> String {
        format!("Zone {}", self.zone_number)
    }
}

/// First zone containing `heart_rate`, or zone 1 for values that fall between
/// the integer bounds (e.g. 128.5).
pub fn zone_for(heart_rate: f64) -> &'static HeartRateZone {
    ZONES
        .iter()
        .find(|zone| zone.contains(heart_rate))
        .unwrap_or(&ZONES[0])
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneDuration {
    pub zone: HeartRateZone,
    pub seconds: f64,
}

/// Time spent in each zone, assuming each sample covers `seconds_per_sample`.
///
/// Samples no zone contains are ignored. Only zones with time in them are
/// returned, lowest zone first.
pub fn time_in_zones(samples: &[QuantitySample], seconds_per_sample: f64) -> Vec<ZoneDuration> {
    let mut totals = [0.0_f64; ZONES.len()];
    for sample in samples {
        if let Some(idx) = ZONES.iter().position(|zone| zone.contains(sample.value)) {
            totals[idx] += seconds_per_sample;
        }
    }

    ZONES
        .iter()
        .zip(totals)
        .filter(|(_, seconds)| *seconds > 0.0)
        .map(|(zone, seconds)| ZoneDuration {
            zone: *zone,
            seconds,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn samples(values: &[f64]) -> Vec<QuantitySample> {
        let date = datetime!(2025-11-07 18:00 UTC);
        values
            .iter()
            .map(|v| QuantitySample::new(*v, date))
            .collect()
    }

    #[test]
    fn test_zone_boundaries() {
        assert_eq!(zone_for(60.0).zone_number, 1);
        assert_eq!(zone_for(128.0).zone_number, 1);
        assert_eq!(zone_for(129.0).zone_number, 2);
        assert_eq!(zone_for(153.0).zone_number, 3);
        assert_eq!(zone_for(154.0).zone_number, 4);
        assert_eq!(zone_for(166.0).zone_number, 5);
        assert_eq!(zone_for(210.0).zone_number, 5);
    }

    #[test]
    fn test_gap_between_bounds_falls_back_to_zone_one() {
        assert!(ZONES.iter().all(|zone| !zone.contains(128.5)));
        assert_eq!(zone_for(128.5).zone_number, 1);
    }

    #[test]
    fn test_time_in_zones() {
        let durations = time_in_zones(&samples(&[120.0, 125.0, 150.0, 170.0, 141.5]), 10.0);

        let summary: Vec<(u8, f64)> = durations
            .iter()
            .map(|d| (d.zone.zone_number, d.seconds))
            .collect();
        assert_eq!(summary, vec![(1, 20.0), (3, 10.0), (5, 10.0)]);
    }

    #[test]
    fn test_time_in_zones_empty() {
        assert!(time_in_zones(&[], 10.0).is_empty());
    }

    #[test]
    fn test_label() {
        assert_eq!(ZONES[3].label(), "Zone 4");
    }
}
