use geo::geometry::Point;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::color::{self, Color};

/// One GPS fix along a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub lat: f64,
    pub lon: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl LocationSample {
    pub fn new(lat: f64, lon: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            lat,
            lon,
            timestamp,
        }
    }

    /// Coordinate as a `geo` point (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutActivityType {
    Running,
    Hiking,
    Other,
}

impl WorkoutActivityType {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Running => "Run",
            Self::Hiking => "Hike",
            Self::Other => "Activity",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Running => color::RUN,
            Self::Hiking => color::HIKE,
            Self::Other => color::ACCENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub activity_type: WorkoutActivityType,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    pub distance_meters: Option<f64>,
    pub elevation_ascended_meters: Option<f64>,
    pub average_heart_rate: Option<u32>,
}

impl Workout {
    pub fn new(
        activity_type: WorkoutActivityType,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity_type,
            start,
            end,
            distance_meters: None,
            elevation_ascended_meters: None,
            average_heart_rate: None,
        }
    }

    /// Elapsed time in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).as_seconds_f64()
    }
}

/// Quantities the health data service can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityType {
    ActiveEnergyBurned,
    BasalEnergyBurned,
    HeartRate,
    RestingHeartRate,
    StepCount,
}

impl QuantityType {
    pub fn unit(&self) -> &'static str {
        match self {
            Self::ActiveEnergyBurned | Self::BasalEnergyBurned => "kcal",
            Self::HeartRate | Self::RestingHeartRate => "count/min",
            Self::StepCount => "count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantitySample {
    pub value: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl QuantitySample {
    pub fn new(value: f64, date: OffsetDateTime) -> Self {
        Self { value, date }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsKind {
    CumulativeSum,
    Average,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    InBed,
    Awake,
    Asleep,
    AsleepCore,
    AsleepDeep,
    AsleepRem,
}

impl SleepStage {
    pub fn is_asleep(&self) -> bool {
        matches!(
            self,
            Self::Asleep | Self::AsleepCore | Self::AsleepDeep | Self::AsleepRem
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepSample {
    pub stage: SleepStage,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_point_axis_order() {
        let sample = LocationSample::new(40.0, -105.0, datetime!(2025-10-30 08:00 UTC));
        let point = sample.point();
        assert_eq!(point.x(), -105.0);
        assert_eq!(point.y(), 40.0);
    }

    #[test]
    fn test_workout_duration() {
        let workout = Workout::new(
            WorkoutActivityType::Running,
            datetime!(2025-10-30 08:00 UTC),
            datetime!(2025-10-30 08:42:30 UTC),
        );
        assert_eq!(workout.duration(), 2550.0);
    }

    #[test]
    fn test_sleep_stages() {
        assert!(SleepStage::AsleepDeep.is_asleep());
        assert!(SleepStage::Asleep.is_asleep());
        assert!(!SleepStage::InBed.is_asleep());
        assert!(!SleepStage::Awake.is_asleep());
    }

    #[test]
    fn test_activity_titles() {
        assert_eq!(WorkoutActivityType::Running.title(), "Run");
        assert_eq!(WorkoutActivityType::Hiking.title(), "Hike");
        assert_eq!(WorkoutActivityType::Other.title(), "Activity");
    }
}
