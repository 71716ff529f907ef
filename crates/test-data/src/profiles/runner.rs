//! Runner profile.

use dashboard::models::WorkoutActivityType;

use super::AthleteProfile;

/// Recreational to competitive running, around 5:00/km by default.
#[derive(Debug, Clone)]
pub struct RunnerProfile {
    base_speed: f64,
    variance: f64,
}

impl Default for RunnerProfile {
    fn default() -> Self {
        Self {
            base_speed: 3.33, // ~5:00/km
            variance: 0.08,
        }
    }
}

impl RunnerProfile {
    /// Creates a runner with a base pace in minutes per kilometer.
    pub fn with_pace(pace_min_per_km: f64) -> Self {
        Self {
            base_speed: 1000.0 / (pace_min_per_km * 60.0),
            ..Default::default()
        }
    }

    /// Creates an elite runner profile (~3:30/km base pace).
    pub fn elite() -> Self {
        Self::with_pace(3.5)
    }

    /// Creates a recreational runner profile (~6:00/km base pace).
    pub fn recreational() -> Self {
        Self::with_pace(6.0)
    }

    /// Same pace with no day-to-day variance.
    pub fn steady(self) -> Self {
        Self {
            variance: 0.0,
            ..self
        }
    }
}

impl AthleteProfile for RunnerProfile {
    fn base_speed_mps(&self) -> f64 {
        self.base_speed
    }

    fn variance(&self) -> f64 {
        self.variance
    }

    fn activity_type(&self) -> WorkoutActivityType {
        WorkoutActivityType::Running
    }
}
