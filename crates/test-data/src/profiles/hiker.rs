//! Hiker profile.

use dashboard::models::WorkoutActivityType;

use super::AthleteProfile;

/// Recreational hiking, about 5.5 km/h on the flat.
#[derive(Debug, Clone)]
pub struct HikerProfile {
    base_speed: f64,
    variance: f64,
}

impl Default for HikerProfile {
    fn default() -> Self {
        Self {
            base_speed: 1.5, // ~5.5 km/h
            variance: 0.12,
        }
    }
}

impl HikerProfile {
    /// Creates a hiker with a base speed in km/h.
    pub fn with_speed(speed_kmh: f64) -> Self {
        Self {
            base_speed: speed_kmh / 3.6,
            ..Default::default()
        }
    }

    /// Creates a fast hiker profile (~6.5 km/h base).
    pub fn fast() -> Self {
        Self::with_speed(6.5)
    }

    /// Slower and less consistent under a full pack.
    pub fn backpacker() -> Self {
        Self {
            base_speed: 1.2,
            variance: 0.15,
        }
    }
}

impl AthleteProfile for HikerProfile {
    fn base_speed_mps(&self) -> f64 {
        self.base_speed
    }

    fn variance(&self) -> f64 {
        self.variance
    }

    fn activity_type(&self) -> WorkoutActivityType {
        WorkoutActivityType::Hiking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = HikerProfile::default();
        assert!((profile.base_speed_mps() - 1.5).abs() < 0.01);
        assert_eq!(profile.activity_type(), WorkoutActivityType::Hiking);
    }

    #[test]
    fn test_presets() {
        assert!(HikerProfile::fast().base_speed_mps() > HikerProfile::default().base_speed_mps());
        assert!(HikerProfile::backpacker().variance() > HikerProfile::default().variance());
    }
}
