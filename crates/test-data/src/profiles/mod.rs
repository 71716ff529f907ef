//! Athletic performance profiles.
//!
//! Profiles supply a steady pace and its day-to-day spread. Route generators
//! use them to turn distance into timestamps when no explicit pace plan is set.

mod hiker;
mod runner;

use dashboard::models::WorkoutActivityType;
use rand_distr::{Distribution, Normal};

pub use hiker::HikerProfile;
pub use runner::RunnerProfile;

/// Trait for athletic performance profiles.
pub trait AthleteProfile: Send + Sync {
    /// Base speed on flat terrain in meters per second.
    fn base_speed_mps(&self) -> f64;

    /// Day-to-day performance variance as a coefficient of variation (0.0 - 1.0).
    ///
    /// A value of 0.1 means typical variation of ±10%.
    fn variance(&self) -> f64;

    /// Workout type recorded for routes generated with this profile.
    fn activity_type(&self) -> WorkoutActivityType;
}

/// Samples a variance factor from a normal distribution around 1.0.
pub fn sample_variance(profile: &dyn AthleteProfile, rng: &mut impl rand::Rng) -> f64 {
    let std_dev = profile.variance();
    if std_dev <= 0.0 {
        return 1.0;
    }
    match Normal::new(1.0, std_dev) {
        Ok(normal) => normal.sample(rng).clamp(0.7, 1.4),
        Err(_) => 1.0,
    }
}

/// Profile speed scaled by `variance_factor`, floored at 0.5 m/s.
pub fn speed_with_variance(profile: &dyn AthleteProfile, variance_factor: f64) -> f64 {
    (profile.base_speed_mps() * variance_factor).max(0.5)
}
