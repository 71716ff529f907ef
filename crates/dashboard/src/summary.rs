//! Time-ranged dashboard summaries.
//!
//! All window arithmetic is done in the UTC offset carried by the `now` the
//! caller passes in; nothing here reads the clock or a process-wide locale.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Duration, OffsetDateTime, Time};
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::heart_rate::{ZoneDuration, time_in_zones};
use crate::heatmap::{Gradient, HeatmapGradientGenerator};
use crate::models::{
    LocationSample, QuantitySample, QuantityType, SleepSample, StatisticsKind, Workout,
};
use crate::provider::{HealthDataProvider, ProviderError};
use crate::route::{RouteMetrics, RouteRegion, score_route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryRange {
    Today,
    Yesterday,
    Last7Days,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    #[serde(with = "time::serde::rfc3339")]
    pub from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub to: OffsetDateTime,
}

fn start_of_day(t: OffsetDateTime) -> OffsetDateTime {
    t.replace_time(Time::MIDNIGHT)
}

impl SummaryRange {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Last7Days => "Last 7 Days",
        }
    }

    pub fn window(&self, now: OffsetDateTime) -> TimeWindow {
        match self {
            Self::Today => TimeWindow {
                from: start_of_day(now),
                to: now,
            },
            Self::Yesterday => TimeWindow {
                from: start_of_day(now - Duration::DAY),
                to: start_of_day(now) - Duration::SECOND,
            },
            Self::Last7Days => TimeWindow {
                from: start_of_day(now - Duration::days(6)),
                to: now,
            },
        }
    }

    /// Per-day value: totals over the last seven days are divided by 7.
    pub fn average_if_needed(&self, value: f64) -> f64 {
        match self {
            Self::Today | Self::Yesterday => value,
            Self::Last7Days => value / 7.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStride {
    Hours(u8),
}

impl SampleStride {
    pub fn duration(&self) -> Duration {
        match self {
            Self::Hours(hours) => Duration::hours(i64::from(*hours)),
        }
    }

    /// Bucket a timestamp falls into, counted from midnight in its own offset.
    /// A zero-hour stride is treated as one hour.
    pub fn bucket(&self, t: OffsetDateTime) -> u32 {
        match self {
            Self::Hours(hours) => u32::from(t.hour()) / u32::from((*hours).max(1)),
        }
    }
}

/// Sums sample values per stride bucket.
pub fn bucket_totals(samples: &[QuantitySample], stride: SampleStride) -> BTreeMap<u32, f64> {
    bucket_samples(samples, stride)
        .into_iter()
        .map(|(key, sample)| (key, sample.value))
        .collect()
}

/// Lowest and highest sample value per stride bucket.
pub fn bucket_extremes(
    samples: &[QuantitySample],
    stride: SampleStride,
) -> (BTreeMap<u32, f64>, BTreeMap<u32, f64>) {
    let mut min: BTreeMap<u32, f64> = BTreeMap::new();
    let mut max: BTreeMap<u32, f64> = BTreeMap::new();
    for sample in samples {
        let key = stride.bucket(sample.date);
        min.entry(key)
            .and_modify(|v| *v = v.min(sample.value))
            .or_insert(sample.value);
        max.entry(key)
            .and_modify(|v| *v = v.max(sample.value))
            .or_insert(sample.value);
    }
    (min, max)
}

/// Sums per bucket like [`bucket_totals`], keeping the date of the first sample seen per bucket.
pub fn bucket_samples(
    samples: &[QuantitySample],
    stride: SampleStride,
) -> BTreeMap<u32, QuantitySample> {
    let mut buckets: BTreeMap<u32, QuantitySample> = BTreeMap::new();
    for sample in samples {
        buckets
            .entry(stride.bucket(sample.date))
            .and_modify(|existing| existing.value += sample.value)
            .or_insert(*sample);
    }
    buckets
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartRateChartPoint {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub min_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
}

/// Merges per-bucket minimum and maximum heart rates into one date-ordered
/// series. Bucket `k` is dated `from + k * stride`.
pub fn heart_rate_series(
    min: &BTreeMap<u32, f64>,
    max: &BTreeMap<u32, f64>,
    from: OffsetDateTime,
    stride: SampleStride,
) -> Vec<HeartRateChartPoint> {
    let mut combined: BTreeMap<u32, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for (key, value) in min {
        combined.entry(*key).or_default().0 = Some(*value);
    }
    for (key, value) in max {
        combined.entry(*key).or_default().1 = Some(*value);
    }

    combined
        .into_iter()
        .map(|(key, (min_heart_rate, max_heart_rate))| HeartRateChartPoint {
            date: from + stride.duration() * key,
            min_heart_rate,
            max_heart_rate,
        })
        .collect()
}

/// Total time spent asleep, in seconds.
pub fn sleep_duration(samples: &[SleepSample]) -> f64 {
    samples
        .iter()
        .filter(|s| s.stage.is_asleep())
        .map(|s| (s.end - s.start).as_seconds_f64())
        .sum()
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSummary {
    pub workout: Workout,
    pub route: Option<RouteMetrics>,
    pub region: Option<RouteRegion>,
    pub gradient: Option<Gradient>,
    /// Time in each heart-rate zone during the workout.
    pub heart_rate_zones: Vec<ZoneDuration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub range: SummaryRange,
    pub description: &'static str,
    pub window: TimeWindow,
    pub calories_burned: Option<i64>,
    pub min_heart_rate: Option<i64>,
    pub max_heart_rate: Option<i64>,
    pub resting_heart_rate: Option<i64>,
    pub sleep_duration_seconds: Option<f64>,
    pub steps: Option<i64>,
    pub workouts: Vec<WorkoutSummary>,
    /// Intraday totals per stride bucket, today only.
    pub calorie_buckets: BTreeMap<u32, f64>,
    pub step_buckets: BTreeMap<u32, f64>,
    /// Intraday min/max heart rate per stride bucket, today only.
    pub heart_rate_series: Vec<HeartRateChartPoint>,
}

/// Half a day; sleep is attributed to the day it ends on.
const SLEEP_LOOKBACK: Duration = Duration::hours(12);

const ENERGY_QUANTITIES: [QuantityType; 2] = [
    QuantityType::ActiveEnergyBurned,
    QuantityType::BasalEnergyBurned,
];
const STEP_QUANTITIES: [QuantityType; 1] = [QuantityType::StepCount];

fn optional<T>(metric: &str, result: Result<T, ProviderError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(ProviderError::MissingValue(quantity)) => {
            debug!(metric, ?quantity, "no data for summary metric");
            None
        }
        Err(e) => {
            warn!(metric, "failed to fetch summary metric: {e}");
            None
        }
    }
}

pub struct SummaryAggregator<P> {
    provider: P,
    heatmap: HeatmapGradientGenerator,
    intraday_stride: SampleStride,
}

impl<P: HealthDataProvider> SummaryAggregator<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, &DashboardConfig::default())
    }

    pub fn with_config(provider: P, config: &DashboardConfig) -> Self {
        Self {
            provider,
            heatmap: config.heatmap_generator(),
            intraday_stride: SampleStride::Hours(config.hour_stride),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Builds the summary for `range` as seen at `now`.
    ///
    /// Each metric is fetched independently; a metric the provider cannot
    /// supply is left empty rather than failing the summary.
    pub async fn fetch_summary(&self, range: SummaryRange, now: OffsetDateTime) -> Summary {
        let window = range.window(now);

        let (calories, min_hr, max_hr, resting_hr, sleep, steps, workouts) = tokio::join!(
            self.calories(range, window),
            self.statistic(StatisticsKind::Min, QuantityType::HeartRate, window),
            self.statistic(StatisticsKind::Max, QuantityType::HeartRate, window),
            self.statistic(StatisticsKind::Average, QuantityType::RestingHeartRate, window),
            self.sleep(range, window),
            self.statistic(StatisticsKind::CumulativeSum, QuantityType::StepCount, window),
            self.workouts(window),
        );

        let (calorie_buckets, step_buckets, heart_rate_series) =
            if range == SummaryRange::Today {
                tokio::join!(
                    self.intraday(&ENERGY_QUANTITIES, window),
                    self.intraday(&STEP_QUANTITIES, window),
                    self.heart_rate_chart(window),
                )
            } else {
                (BTreeMap::new(), BTreeMap::new(), Vec::new())
            };

        Summary {
            range,
            description: range.description(),
            window,
            calories_burned: optional("calories", calories)
                .map(|v| range.average_if_needed(v) as i64),
            min_heart_rate: optional("min_heart_rate", min_hr).map(|v| v as i64),
            max_heart_rate: optional("max_heart_rate", max_hr).map(|v| v as i64),
            resting_heart_rate: optional("resting_heart_rate", resting_hr).map(|v| v as i64),
            sleep_duration_seconds: optional("sleep", sleep),
            steps: optional("steps", steps).map(|v| range.average_if_needed(v) as i64),
            workouts: optional("workouts", workouts).unwrap_or_default(),
            calorie_buckets,
            step_buckets,
            heart_rate_series,
        }
    }

    async fn statistic(
        &self,
        kind: StatisticsKind,
        quantity: QuantityType,
        window: TimeWindow,
    ) -> Result<f64, ProviderError> {
        self.provider
            .fetch_statistics(kind, quantity, window.from, window.to)
            .await
    }

    async fn calories(
        &self,
        range: SummaryRange,
        window: TimeWindow,
    ) -> Result<f64, ProviderError> {
        let [active_type, basal_type] = ENERGY_QUANTITIES;
        let active = self
            .statistic(StatisticsKind::CumulativeSum, active_type, window)
            .await?;
        let basal = self
            .statistic(StatisticsKind::CumulativeSum, basal_type, window)
            .await?;
        debug!(range = range.description(), active, basal, "calories");
        Ok(active + basal)
    }

    async fn sleep(&self, range: SummaryRange, window: TimeWindow) -> Result<f64, ProviderError> {
        let from = window.from - SLEEP_LOOKBACK;
        let to = match range {
            SummaryRange::Yesterday => window.to - SLEEP_LOOKBACK,
            SummaryRange::Today | SummaryRange::Last7Days => window.to,
        };
        let samples = self.provider.fetch_sleep(from, to).await?;
        Ok(range.average_if_needed(sleep_duration(&samples)))
    }

    async fn workouts(&self, window: TimeWindow) -> Result<Vec<WorkoutSummary>, ProviderError> {
        let workouts = self
            .provider
            .fetch_workouts(window.from, window.to, None)
            .await?;

        let mut summaries = Vec::with_capacity(workouts.len());
        for workout in workouts {
            let route = match self.provider.fetch_route(workout.id).await {
                Ok(route) => route,
                Err(e) => {
                    warn!(workout_id = %workout.id, "failed to fetch route: {e}");
                    Vec::new()
                }
            };
            let zones = self.heart_rate_zones(&workout).await;
            summaries.push(self.workout_summary(workout, &route, zones));
        }
        Ok(summaries)
    }

    /// Zone breakdown assuming the workout's samples are evenly spaced over it.
    async fn heart_rate_zones(&self, workout: &Workout) -> Vec<ZoneDuration> {
        let samples = match self
            .provider
            .fetch_samples(QuantityType::HeartRate, workout.start, workout.end)
            .await
        {
            Ok(samples) => samples,
            Err(e) => {
                warn!(workout_id = %workout.id, "failed to fetch workout heart rate: {e}");
                return Vec::new();
            }
        };
        if samples.is_empty() {
            return Vec::new();
        }
        time_in_zones(&samples, workout.duration() / samples.len() as f64)
    }

    fn workout_summary(
        &self,
        workout: Workout,
        route: &[LocationSample],
        heart_rate_zones: Vec<ZoneDuration>,
    ) -> WorkoutSummary {
        if route.is_empty() {
            return WorkoutSummary {
                workout,
                route: None,
                region: None,
                gradient: None,
                heart_rate_zones,
            };
        }

        let gradient = self.heatmap.gradient(route, workout.activity_type.color());
        WorkoutSummary {
            route: Some(score_route(route)),
            region: RouteRegion::from_points(route),
            gradient: Some(gradient),
            heart_rate_zones,
            workout,
        }
    }

    async fn heart_rate_chart(&self, window: TimeWindow) -> Vec<HeartRateChartPoint> {
        match self
            .provider
            .fetch_samples(QuantityType::HeartRate, window.from, window.to)
            .await
        {
            Ok(samples) => {
                let (min, max) = bucket_extremes(&samples, self.intraday_stride);
                heart_rate_series(&min, &max, window.from, self.intraday_stride)
            }
            Err(e) => {
                warn!("failed to fetch intraday heart rate: {e}");
                Vec::new()
            }
        }
    }

    async fn intraday(
        &self,
        quantities: &[QuantityType],
        window: TimeWindow,
    ) -> BTreeMap<u32, f64> {
        let mut samples = Vec::new();
        for quantity in quantities {
            match self
                .provider
                .fetch_samples(*quantity, window.from, window.to)
                .await
            {
                Ok(fetched) => samples.extend(fetched),
                Err(e) => warn!(?quantity, "failed to fetch intraday samples: {e}"),
            }
        }
        bucket_totals(&samples, self.intraday_stride)
    }
}
