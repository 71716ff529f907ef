//! Synthetic route generation.

use std::f64::consts::{PI, TAU};

use dashboard::models::LocationSample;
use dashboard::route::distance_between;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::profiles::{self, AthleteProfile};

const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Geographic bounding box defined by southwest and northeast corners.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Returns a random point within the bounding box.
    pub fn random_point(&self, rng: &mut impl Rng) -> (f64, f64) {
        (
            rng.gen_range(self.min_lat..self.max_lat),
            rng.gen_range(self.min_lon..self.max_lon),
        )
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Pre-defined areas for generated routes.
#[derive(Debug, Clone, Copy)]
pub struct Region;

impl Region {
    /// Boulder, CO trails.
    pub const BOULDER: BoundingBox = BoundingBox::new(39.9, -105.5, 40.1, -105.2);

    /// Cupertino, CA neighborhood loops.
    pub const CUPERTINO: BoundingBox = BoundingBox::new(37.30, -122.07, 37.34, -122.00);
}

/// Shape of the generated path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoutePattern {
    /// Evenly spaced points along a fixed compass heading.
    Straight { heading_degrees: f64 },
    /// Random walk with momentum, bounced back inside the bounds.
    RandomWalk,
}

/// Pace held until the route reaches `until_fraction` of its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSegment {
    pub until_fraction: f64,
    pub speed_mps: f64,
}

#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Target distance in meters.
    pub distance_meters: f64,
    /// Starting point (lat, lon). If None, random within bounds.
    pub start_point: Option<(f64, f64)>,
    pub bounds: BoundingBox,
    pub pattern: RoutePattern,
    /// GPS position jitter standard deviation in meters.
    pub gps_jitter_m: f64,
    /// Approximate distance between points in meters.
    pub point_spacing_m: f64,
    /// Timestamp of the first point. If None, the current time.
    pub start_time: Option<OffsetDateTime>,
    /// Sorted by `until_fraction`. Empty means the profile pace is used.
    pub speed_plan: Vec<SpeedSegment>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            distance_meters: 5000.0,
            start_point: None,
            bounds: Region::BOULDER,
            pattern: RoutePattern::RandomWalk,
            gps_jitter_m: 3.0,
            point_spacing_m: 10.0,
            start_time: None,
            speed_plan: Vec::new(),
        }
    }
}

/// Generates timestamped routes for heatmap and summary scenarios.
#[derive(Debug, Clone, Default)]
pub struct RouteGenerator {
    config: RouteConfig,
}

impl RouteGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target distance.
    pub fn with_distance(mut self, meters: f64) -> Self {
        self.config.distance_meters = meters;
        self
    }

    /// Sets the starting point.
    pub fn with_start(mut self, lat: f64, lon: f64) -> Self {
        self.config.start_point = Some((lat, lon));
        self
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.config.bounds = bounds;
        self
    }

    pub fn with_pattern(mut self, pattern: RoutePattern) -> Self {
        self.config.pattern = pattern;
        self
    }

    /// Sets GPS jitter amount; zero keeps points exactly on the path.
    pub fn with_gps_jitter(mut self, meters: f64) -> Self {
        self.config.gps_jitter_m = meters;
        self
    }

    /// Sets point spacing.
    pub fn with_point_spacing(mut self, meters: f64) -> Self {
        self.config.point_spacing_m = meters;
        self
    }

    pub fn with_start_time(mut self, start: OffsetDateTime) -> Self {
        self.config.start_time = Some(start);
        self
    }

    /// Replaces profile pacing with fixed speeds over fractions of the route.
    ///
    /// Each `(until_fraction, speed_mps)` pair holds its speed up to that
    /// fraction of the total distance. Past the last pair the final speed
    /// continues.
    pub fn with_speed_plan(mut self, plan: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut plan: Vec<SpeedSegment> = plan
            .into_iter()
            .map(|(until_fraction, speed_mps)| SpeedSegment {
                until_fraction,
                speed_mps,
            })
            .collect();
        plan.sort_by(|a, b| a.until_fraction.total_cmp(&b.until_fraction));
        self.config.speed_plan = plan;
        self
    }

    /// Generates a route paced by the speed plan, or by `profile` without one.
    ///
    /// Timestamps are strictly increasing.
    pub fn generate(&self, profile: &dyn AthleteProfile, rng: &mut impl Rng) -> Vec<LocationSample> {
        let start = self
            .config
            .start_point
            .unwrap_or_else(|| self.config.bounds.random_point(rng));

        let path = self.generate_path(start, rng);
        let route = self.apply_timing(&path, profile, rng);
        debug!(
            points = route.len(),
            distance = self.config.distance_meters,
            "generated route"
        );
        route
    }

    /// Generates the path coordinates only.
    pub fn generate_path(&self, start: (f64, f64), rng: &mut impl Rng) -> Vec<(f64, f64)> {
        let spacing = self.config.point_spacing_m.max(1.0);
        let mut path = vec![start];
        let mut current = start;
        let mut total_distance = 0.0;

        let mut heading = match self.config.pattern {
            RoutePattern::Straight { heading_degrees } => heading_degrees.to_radians(),
            RoutePattern::RandomWalk => rng.gen_range(0.0..TAU),
        };

        while total_distance < self.config.distance_meters {
            let step = match self.config.pattern {
                RoutePattern::Straight { .. } => spacing,
                RoutePattern::RandomWalk => {
                    heading += rng.gen_range(-0.3..0.3);
                    spacing * rng.gen_range(0.8..1.2)
                }
            };

            let lat_delta = (step * heading.cos()) / METERS_PER_DEGREE_LAT;
            let lon_delta =
                (step * heading.sin()) / (METERS_PER_DEGREE_LAT * current.0.to_radians().cos());
            let mut next = (current.0 + lat_delta, current.1 + lon_delta);

            if self.config.pattern == RoutePattern::RandomWalk {
                let (lat, lon, bounced) = self.apply_bounds(next.0, next.1, heading);
                next = (lat, lon);
                heading = bounced;
            }

            current = next;
            path.push(current);
            total_distance += step;
        }

        path
    }

    /// Reflects the heading at the box edges and pulls the point back inside.
    fn apply_bounds(&self, lat: f64, lon: f64, heading: f64) -> (f64, f64, f64) {
        let b = &self.config.bounds;
        let mut new_heading = heading;

        let lat = if lat < b.min_lat {
            new_heading = PI - heading;
            b.min_lat + (b.min_lat - lat).min(0.001)
        } else if lat > b.max_lat {
            new_heading = PI - heading;
            b.max_lat - (lat - b.max_lat).min(0.001)
        } else {
            lat
        };

        let lon = if lon < b.min_lon {
            new_heading = -heading;
            b.min_lon + (b.min_lon - lon).min(0.001)
        } else if lon > b.max_lon {
            new_heading = -heading;
            b.max_lon - (lon - b.max_lon).min(0.001)
        } else {
            lon
        };

        (lat, lon, new_heading)
    }

    fn planned_speed(&self, fraction: f64) -> Option<f64> {
        let plan = &self.config.speed_plan;
        plan.iter()
            .find(|segment| fraction <= segment.until_fraction)
            .or(plan.last())
            .map(|segment| segment.speed_mps)
            .filter(|speed| speed.is_finite() && *speed > 0.0)
    }

    /// Times each leg from its true length so measured speed matches the plan.
    fn apply_timing(
        &self,
        path: &[(f64, f64)],
        profile: &dyn AthleteProfile,
        rng: &mut impl Rng,
    ) -> Vec<LocationSample> {
        let Some(&(lat, lon)) = path.first() else {
            return Vec::new();
        };

        let ideal: Vec<LocationSample> = path
            .iter()
            .map(|&(lat, lon)| LocationSample::new(lat, lon, OffsetDateTime::UNIX_EPOCH))
            .collect();
        let legs: Vec<f64> = ideal
            .windows(2)
            .map(|pair| distance_between(&pair[0], &pair[1]))
            .collect();
        let total: f64 = legs.iter().sum();

        let jitter = Normal::new(0.0, self.config.gps_jitter_m / METERS_PER_DEGREE_LAT).ok();

        let mut timestamp = self.config.start_time.unwrap_or_else(OffsetDateTime::now_utc);
        let mut result = Vec::with_capacity(path.len());
        result.push(LocationSample::new(
            lat + jitter_offset(jitter, rng),
            lon + jitter_offset(jitter, rng),
            timestamp,
        ));

        let mut covered = 0.0;
        for (&(lat, lon), &leg) in path.iter().skip(1).zip(&legs) {
            let midpoint = if total > 0.0 {
                (covered + leg / 2.0) / total
            } else {
                0.0
            };
            covered += leg;

            let speed = self.planned_speed(midpoint).unwrap_or_else(|| {
                let variance = profiles::sample_variance(profile, rng);
                profiles::speed_with_variance(profile, variance)
            });

            timestamp += Duration::seconds_f64((leg / speed).max(0.001));
            result.push(LocationSample::new(
                lat + jitter_offset(jitter, rng),
                lon + jitter_offset(jitter, rng),
                timestamp,
            ));
        }

        result
    }
}

fn jitter_offset(jitter: Option<Normal<f64>>, rng: &mut impl Rng) -> f64 {
    jitter.map_or(0.0, |normal| normal.sample(rng))
}
