//! Boundary to the health data service.
//!
//! The dashboard never talks to a concrete health store directly. Anything that
//! can answer these queries implements [`HealthDataProvider`];
//! [`InMemoryProvider`] answers them from samples handed to it up front.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    LocationSample, QuantitySample, QuantityType, SleepSample, StatisticsKind, Workout,
    WorkoutActivityType,
};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No {0:?} data in the requested window")]
    MissingValue(QuantityType),
    #[error("Workout not found: {0}")]
    WorkoutNotFound(Uuid),
    #[error("Health data unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait HealthDataProvider: Send + Sync {
    /// Workouts starting inside `[from, to]`, optionally of a single type.
    async fn fetch_workouts(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
        activity_type: Option<WorkoutActivityType>,
    ) -> Result<Vec<Workout>, ProviderError>;

    /// Route of a workout in recording order. Empty when the workout has no route.
    async fn fetch_route(&self, workout_id: Uuid) -> Result<Vec<LocationSample>, ProviderError>;

    async fn fetch_samples(
        &self,
        quantity: QuantityType,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<QuantitySample>, ProviderError>;

    async fn fetch_statistics(
        &self,
        kind: StatisticsKind,
        quantity: QuantityType,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<f64, ProviderError>;

    async fn fetch_sleep(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<SleepSample>, ProviderError>;
}

fn in_window(t: OffsetDateTime, from: OffsetDateTime, to: OffsetDateTime) -> bool {
    from <= t && t <= to
}

#[derive(Debug, Default)]
struct Store {
    workouts: Vec<Workout>,
    routes: HashMap<Uuid, Vec<LocationSample>>,
    samples: HashMap<QuantityType, Vec<QuantitySample>>,
    sleep: Vec<SleepSample>,
}

/// Provider backed by samples held in memory.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    store: RwLock<Store>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_workout(&self, workout: Workout, route: Vec<LocationSample>) {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        if !route.is_empty() {
            store.routes.insert(workout.id, route);
        }
        store.workouts.push(workout);
    }

    pub fn add_samples(&self, quantity: QuantityType, samples: impl IntoIterator<Item = QuantitySample>) {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        store.samples.entry(quantity).or_default().extend(samples);
    }

    pub fn add_sleep(&self, samples: impl IntoIterator<Item = SleepSample>) {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        store.sleep.extend(samples);
    }

    fn values_in(&self, quantity: QuantityType, from: OffsetDateTime, to: OffsetDateTime) -> Vec<f64> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        store
            .samples
            .get(&quantity)
            .map(|samples| {
                samples
                    .iter()
                    .filter(|s| in_window(s.date, from, to))
                    .map(|s| s.value)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl HealthDataProvider for InMemoryProvider {
    async fn fetch_workouts(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
        activity_type: Option<WorkoutActivityType>,
    ) -> Result<Vec<Workout>, ProviderError> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        Ok(store
            .workouts
            .iter()
            .filter(|w| in_window(w.start, from, to))
            .filter(|w| activity_type.is_none_or(|t| w.activity_type == t))
            .cloned()
            .collect())
    }

    async fn fetch_route(&self, workout_id: Uuid) -> Result<Vec<LocationSample>, ProviderError> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        if !store.workouts.iter().any(|w| w.id == workout_id) {
            return Err(ProviderError::WorkoutNotFound(workout_id));
        }
        Ok(store.routes.get(&workout_id).cloned().unwrap_or_default())
    }

    async fn fetch_samples(
        &self,
        quantity: QuantityType,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<QuantitySample>, ProviderError> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        let mut samples: Vec<QuantitySample> = store
            .samples
            .get(&quantity)
            .map(|samples| {
                samples
                    .iter()
                    .filter(|s| in_window(s.date, from, to))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        // Newest first
        samples.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(samples)
    }

    async fn fetch_statistics(
        &self,
        kind: StatisticsKind,
        quantity: QuantityType,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<f64, ProviderError> {
        let values = self.values_in(quantity, from, to);
        if values.is_empty() {
            return Err(ProviderError::MissingValue(quantity));
        }

        let value = match kind {
            StatisticsKind::CumulativeSum => values.iter().sum(),
            StatisticsKind::Average => values.iter().sum::<f64>() / values.len() as f64,
            StatisticsKind::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            StatisticsKind::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        };
        Ok(value)
    }

    async fn fetch_sleep(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<SleepSample>, ProviderError> {
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        Ok(store
            .sleep
            .iter()
            .filter(|s| in_window(s.start, from, to))
            .copied()
            .collect())
    }
}
