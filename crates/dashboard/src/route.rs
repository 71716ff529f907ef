//! Route geometry: cumulative distance, map region, and whole-route metrics.

use geo::{Distance as _, Haversine};
use serde::Serialize;
use time::OffsetDateTime;

use crate::models::LocationSample;

/// Great-circle distance in meters between two samples.
pub fn distance_between(a: &LocationSample, b: &LocationSample) -> f64 {
    Haversine.distance(a.point(), b.point())
}

/// Running distance from the first sample to each sample. Entry 0 is always 0.
pub fn cumulative_distances(points: &[LocationSample]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    if points.is_empty() {
        return cumulative;
    }

    cumulative.push(0.0);
    for pair in points.windows(2) {
        let last = cumulative[cumulative.len() - 1];
        cumulative.push(last + distance_between(&pair[0], &pair[1]));
    }
    cumulative
}

/// Map region framing a route, padded so the polyline does not touch the edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteRegion {
    pub center_lat: f64,
    pub center_lon: f64,
    pub lat_delta: f64,
    pub lon_delta: f64,
}

impl RouteRegion {
    const MIN_DELTA: f64 = 0.001;
    const LAT_PADDING: f64 = 1.3;
    const LON_PADDING: f64 = 1.7;

    pub fn from_points(points: &[LocationSample]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_lat, mut max_lat) = (first.lat, first.lat);
        let (mut min_lon, mut max_lon) = (first.lon, first.lon);

        for p in &points[1..] {
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
            min_lon = min_lon.min(p.lon);
            max_lon = max_lon.max(p.lon);
        }

        Some(Self {
            center_lat: (min_lat + max_lat) / 2.0,
            center_lon: (min_lon + max_lon) / 2.0,
            lat_delta: ((max_lat - min_lat) * Self::LAT_PADDING).max(Self::MIN_DELTA),
            lon_delta: ((max_lon - min_lon) * Self::LON_PADDING).max(Self::MIN_DELTA),
        })
    }
}

/// Incremental metric over the samples of a route.
pub trait TrackMetric {
    type Score;
    fn next_point(&mut self, point: &LocationSample);
    fn finish(&mut self) -> Self::Score;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RouteMetrics {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Zero when the route has no elapsed time.
    pub average_speed_mps: f64,
}

pub fn score_route(points: &[LocationSample]) -> RouteMetrics {
    let mut acc = Metrics::default();
    for point in points {
        acc.next_point(point);
    }
    acc.finish()
}

#[derive(Debug, Clone, Default)]
struct Metrics {
    distance: DistanceMetric,
    duration: DurationMetric,
}

impl TrackMetric for Metrics {
    type Score = RouteMetrics;

    fn next_point(&mut self, point: &LocationSample) {
        self.distance.next_point(point);
        self.duration.next_point(point);
    }

    fn finish(&mut self) -> RouteMetrics {
        let distance_meters = self.distance.finish();
        let duration_seconds = self.duration.finish();
        let average_speed_mps = if duration_seconds > 0.0 {
            distance_meters / duration_seconds
        } else {
            0.0
        };

        RouteMetrics {
            distance_meters,
            duration_seconds,
            average_speed_mps,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct DistanceMetric {
    total_distance: f64,
    last_point: Option<LocationSample>,
}

impl TrackMetric for DistanceMetric {
    type Score = f64;

    fn next_point(&mut self, point: &LocationSample) {
        self.total_distance += self
            .last_point
            .map_or(0.0, |prev| distance_between(&prev, point));
        self.last_point = Some(*point);
    }

    fn finish(&mut self) -> f64 {
        self.total_distance
    }
}

#[derive(Debug, Clone, Default)]
struct DurationMetric {
    start_time: Option<OffsetDateTime>,
    end_time: Option<OffsetDateTime>,
}

impl TrackMetric for DurationMetric {
    type Score = f64;

    fn next_point(&mut self, point: &LocationSample) {
        if self.start_time.is_none() {
            self.start_time = Some(point.timestamp);
        }
        self.end_time = Some(point.timestamp);
    }

    fn finish(&mut self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).as_seconds_f64(),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    fn equator_route(count: usize, step_deg: f64, step_secs: i64) -> Vec<LocationSample> {
        let start = datetime!(2025-10-30 07:00 UTC);
        (0..count)
            .map(|i| {
                LocationSample::new(
                    0.0,
                    step_deg * i as f64,
                    start + Duration::seconds(step_secs * i as i64),
                )
            })
            .collect()
    }

    #[test]
    fn test_cumulative_distances() {
        let route = equator_route(3, 0.0009, 20);
        let cumulative = cumulative_distances(&route);

        assert_eq!(cumulative.len(), 3);
        assert_eq!(cumulative[0], 0.0);
        assert!((cumulative[1] - 100.08).abs() < 0.5);
        assert!((cumulative[2] - 2.0 * cumulative[1]).abs() < 1e-6);
    }

    #[test]
    fn test_cumulative_distances_empty() {
        assert!(cumulative_distances(&[]).is_empty());
    }

    #[test]
    fn test_one_degree_latitude() {
        let t = datetime!(2025-10-30 07:00 UTC);
        let a = LocationSample::new(0.0, 0.0, t);
        let b = LocationSample::new(1.0, 0.0, t);
        assert!((distance_between(&a, &b) - 111_000.0).abs() < 1000.0);
    }

    #[test]
    fn test_region_padding() {
        let t = datetime!(2025-10-30 07:00 UTC);
        let route = vec![
            LocationSample::new(40.0, -105.3, t),
            LocationSample::new(40.1, -105.2, t),
        ];
        let region = RouteRegion::from_points(&route).unwrap();

        assert!((region.center_lat - 40.05).abs() < 1e-9);
        assert!((region.center_lon + 105.25).abs() < 1e-9);
        assert!((region.lat_delta - 0.13).abs() < 1e-9);
        assert!((region.lon_delta - 0.17).abs() < 1e-9);
    }

    #[test]
    fn test_region_minimum_span() {
        let route = equator_route(1, 0.0, 0);
        let region = RouteRegion::from_points(&route).unwrap();
        assert_eq!(region.lat_delta, 0.001);
        assert_eq!(region.lon_delta, 0.001);

        assert!(RouteRegion::from_points(&[]).is_none());
    }

    #[test]
    fn test_score_route() {
        let route = equator_route(5, 0.0009, 20);
        let metrics = score_route(&route);

        assert!((metrics.distance_meters - 400.3).abs() < 1.0);
        assert_eq!(metrics.duration_seconds, 80.0);
        assert!((metrics.average_speed_mps - 5.0).abs() < 0.05);
    }

    #[test]
    fn test_score_empty_route() {
        assert_eq!(score_route(&[]), RouteMetrics::default());
    }
}
