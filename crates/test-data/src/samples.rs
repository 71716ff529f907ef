//! Synthetic health samples.
//!
//! Produces hourly energy, step, and heart-rate samples plus a night of sleep
//! stages, shaped roughly like a weekday: quiet overnight, busier during the
//! day.

use dashboard::models::{QuantitySample, QuantityType, SleepSample, SleepStage};
use dashboard::provider::InMemoryProvider;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use time::{Duration, OffsetDateTime};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DaySamplesConfig {
    /// Mean steps per waking hour.
    pub steps_per_hour: f64,
    pub active_kcal_per_hour: f64,
    pub basal_kcal_per_hour: f64,
    pub resting_heart_rate: f64,
    /// Standard deviation of the hourly heart rate around its mean.
    pub heart_rate_spread: f64,
    /// Hour of the day the night's sleep ends.
    pub wake_hour: i64,
    pub sleep_hours: f64,
}

impl Default for DaySamplesConfig {
    fn default() -> Self {
        Self {
            steps_per_hour: 600.0,
            active_kcal_per_hour: 35.0,
            basal_kcal_per_hour: 70.0,
            resting_heart_rate: 58.0,
            heart_rate_spread: 8.0,
            wake_hour: 7,
            sleep_hours: 7.5,
        }
    }
}

/// Samples covering a single day.
#[derive(Debug, Clone, Default)]
pub struct DaySamples {
    pub active_energy: Vec<QuantitySample>,
    pub basal_energy: Vec<QuantitySample>,
    pub steps: Vec<QuantitySample>,
    pub heart_rate: Vec<QuantitySample>,
    pub resting_heart_rate: Vec<QuantitySample>,
    pub sleep: Vec<SleepSample>,
}

const SLEEP_CYCLE: [(SleepStage, i64); 3] = [
    (SleepStage::AsleepCore, 45),
    (SleepStage::AsleepDeep, 25),
    (SleepStage::AsleepRem, 20),
];

impl DaySamples {
    /// Generates hourly samples for the day starting at `day_start`, stopping
    /// before `until` so a partial day can stand in for today.
    pub fn generate(
        config: &DaySamplesConfig,
        day_start: OffsetDateTime,
        until: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Self {
        let mut day = Self::default();
        let heart_noise = Normal::new(0.0, config.heart_rate_spread.max(0.0)).ok();

        for hour in 0..24 {
            let at = day_start + Duration::hours(hour) + Duration::minutes(30);
            if at >= until {
                break;
            }

            let awake = hour >= config.wake_hour && hour < 23;
            let activity = if awake { rng.gen_range(0.5..1.5) } else { 0.05 };

            day.basal_energy
                .push(QuantitySample::new(config.basal_kcal_per_hour, at));
            day.active_energy.push(QuantitySample::new(
                (config.active_kcal_per_hour * activity).round(),
                at,
            ));
            day.steps.push(QuantitySample::new(
                (config.steps_per_hour * activity).round(),
                at,
            ));

            let lift = if awake { 20.0 * activity } else { 0.0 };
            let noise = heart_noise.map_or(0.0, |normal| normal.sample(rng)).abs();
            day.heart_rate.push(QuantitySample::new(
                (config.resting_heart_rate + lift + noise).round(),
                at,
            ));
        }

        let wake = day_start + Duration::hours(config.wake_hour);
        if wake < until {
            day.resting_heart_rate
                .push(QuantitySample::new(config.resting_heart_rate, wake));
        }
        day.sleep = night(wake, config.sleep_hours);

        debug!(
            hours = day.steps.len(),
            sleep_stages = day.sleep.len(),
            "generated day samples"
        );
        day
    }

    /// Total of all samples for `quantity`.
    pub fn total(&self, quantity: QuantityType) -> f64 {
        self.samples(quantity).iter().map(|s| s.value).sum()
    }

    pub fn samples(&self, quantity: QuantityType) -> &[QuantitySample] {
        match quantity {
            QuantityType::ActiveEnergyBurned => &self.active_energy,
            QuantityType::BasalEnergyBurned => &self.basal_energy,
            QuantityType::HeartRate => &self.heart_rate,
            QuantityType::RestingHeartRate => &self.resting_heart_rate,
            QuantityType::StepCount => &self.steps,
        }
    }

    /// Loads everything into a provider.
    pub fn load_into(&self, provider: &InMemoryProvider) {
        for quantity in [
            QuantityType::ActiveEnergyBurned,
            QuantityType::BasalEnergyBurned,
            QuantityType::HeartRate,
            QuantityType::RestingHeartRate,
            QuantityType::StepCount,
        ] {
            provider.add_samples(quantity, self.samples(quantity).iter().copied());
        }
        provider.add_sleep(self.sleep.iter().copied());
    }
}

/// A night ending at `wake`: in bed, repeated sleep cycles, then a short wake.
fn night(wake: OffsetDateTime, sleep_hours: f64) -> Vec<SleepSample> {
    let asleep_until = wake - Duration::minutes(10);
    let bedtime = asleep_until - Duration::seconds_f64(sleep_hours.max(0.0) * 3600.0);
    let mut stages = vec![SleepSample {
        stage: SleepStage::InBed,
        start: bedtime - Duration::minutes(15),
        end: bedtime,
    }];

    let mut t = bedtime;
    for &(stage, minutes) in SLEEP_CYCLE.iter().cycle() {
        if t >= asleep_until {
            break;
        }
        let end = (t + Duration::minutes(minutes)).min(asleep_until);
        stages.push(SleepSample {
            stage,
            start: t,
            end,
        });
        t = end;
    }

    stages.push(SleepSample {
        stage: SleepStage::Awake,
        start: asleep_until,
        end: wake,
    });
    stages
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard::summary::sleep_duration;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use time::macros::datetime;

    #[test]
    fn test_full_day() {
        let mut rng = StdRng::seed_from_u64(11);
        let start = datetime!(2025-10-30 00:00 UTC);
        let day = DaySamples::generate(
            &DaySamplesConfig::default(),
            start,
            start + Duration::days(1),
            &mut rng,
        );

        assert_eq!(day.steps.len(), 24);
        assert_eq!(day.total(QuantityType::BasalEnergyBurned), 24.0 * 70.0);
        assert_eq!(day.resting_heart_rate.len(), 1);
        assert!(day.heart_rate.iter().all(|s| s.value >= 58.0));
    }

    #[test]
    fn test_partial_day() {
        let mut rng = StdRng::seed_from_u64(11);
        let start = datetime!(2025-10-30 00:00 UTC);
        let day = DaySamples::generate(
            &DaySamplesConfig::default(),
            start,
            datetime!(2025-10-30 05:00 UTC),
            &mut rng,
        );

        assert_eq!(day.steps.len(), 5);
        assert!(day.resting_heart_rate.is_empty());
        assert!(day.steps.iter().all(|s| s.date < datetime!(2025-10-30 05:00 UTC)));
    }

    #[test]
    fn test_night_sleep_duration() {
        let wake = datetime!(2025-10-30 07:00 UTC);
        let stages = night(wake, 7.5);

        assert_eq!(stages.first().map(|s| s.stage), Some(SleepStage::InBed));
        assert_eq!(stages.last().map(|s| s.end), Some(wake));
        assert!((sleep_duration(&stages) - 7.5 * 3600.0).abs() < 1e-6);
    }
}
