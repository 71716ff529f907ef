//! Speed heatmap gradients for route polylines.
//!
//! A route is resampled every `sample_distance_meters` along its cumulative
//! distance, the speed over each resampled window is normalized against the
//! slowest and fastest windows, and each window contributes one color stop at
//! its midpoint. Every degenerate input collapses to a single-color gradient so
//! a route always renders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::{Color, ROUTE_COLORS};
use crate::models::LocationSample;
use crate::route::cumulative_distances;

pub const DEFAULT_SAMPLE_DISTANCE_METERS: f64 = 50.0;

/// Smallest accepted sample spacing. GPS fixes are not meaningful below a
/// meter, and finer spacing only multiplies repeated sample indices.
pub const MIN_SAMPLE_DISTANCE_METERS: f64 = 1.0;

/// Upper bound on resampled points for a single route.
const MAX_SAMPLE_COUNT: usize = 1_000_000;

/// Floor for the speed range so equal speeds do not divide by zero.
const MIN_SPEED_RANGE: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub color: Color,
    /// Fraction (0-1) of the total route distance.
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// One-stop gradient painting the whole route in `color`.
    pub fn solid(color: Color) -> Self {
        Self {
            stops: vec![GradientStop {
                color,
                position: 0.0,
            }],
        }
    }

    pub fn is_solid(&self) -> bool {
        self.stops.len() == 1
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.stops.iter().map(|stop| stop.color)
    }
}

/// Which window a stop is placed in when some sampled windows were skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopAlignment {
    /// Each stop sits at the midpoint of the window its speed was measured over.
    #[default]
    Window,
    /// The n-th retained speed is placed at the n-th sampled window, even when
    /// earlier windows were skipped. Matches gradients rendered by older clients.
    Legacy,
}

impl FromStr for StopAlignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "window" => Ok(Self::Window),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown stop alignment: {other}")),
        }
    }
}

impl fmt::Display for StopAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window => f.write_str("window"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// Speed measured between two resampled indices.
#[derive(Debug, Clone, Copy)]
struct SpeedWindow {
    start_idx: usize,
    end_idx: usize,
    speed: f64,
}

#[derive(Debug, Clone)]
pub struct HeatmapGradientGenerator {
    sample_distance_meters: f64,
    palette: Vec<Color>,
    alignment: StopAlignment,
}

impl Default for HeatmapGradientGenerator {
    fn default() -> Self {
        Self {
            sample_distance_meters: DEFAULT_SAMPLE_DISTANCE_METERS,
            palette: ROUTE_COLORS.to_vec(),
            alignment: StopAlignment::default(),
        }
    }
}

impl HeatmapGradientGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spacing between analysis samples.
    ///
    /// Non-finite values and values below [`MIN_SAMPLE_DISTANCE_METERS`] fall
    /// back to [`DEFAULT_SAMPLE_DISTANCE_METERS`].
    pub fn with_sample_distance(mut self, meters: f64) -> Self {
        self.sample_distance_meters = if is_valid_sample_distance(meters) {
            meters
        } else {
            warn!(
                meters,
                "invalid heatmap sample distance, using {DEFAULT_SAMPLE_DISTANCE_METERS}m"
            );
            DEFAULT_SAMPLE_DISTANCE_METERS
        };
        self
    }

    /// Replaces the slow-to-fast palette. An empty palette paints every stop
    /// in the caller's default color.
    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_alignment(mut self, alignment: StopAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn sample_distance_meters(&self) -> f64 {
        self.sample_distance_meters
    }

    pub fn alignment(&self) -> StopAlignment {
        self.alignment
    }

    /// Builds the speed gradient for a chronologically ordered route.
    ///
    /// Input order is trusted: out-of-order timestamps produce skipped windows
    /// and, at worst, the solid fallback.
    pub fn gradient(&self, points: &[LocationSample], default_color: Color) -> Gradient {
        if points.len() <= 1 {
            debug!(points = points.len(), "route too short for heatmap");
            return Gradient::solid(default_color);
        }

        let cumulative = cumulative_distances(points);
        let total_distance = cumulative.last().copied().unwrap_or(0.0);
        if total_distance.is_nan() || total_distance <= 0.0 {
            debug!(total_distance, "route has no length");
            return Gradient::solid(default_color);
        }

        let sample_indices = self.sample_indices(&cumulative, total_distance);
        let windows = speed_windows(points, &cumulative, &sample_indices);
        if windows.is_empty() {
            debug!(
                samples = sample_indices.len(),
                "no sampled window has positive elapsed time"
            );
            return Gradient::solid(default_color);
        }

        let (min_speed, max_speed) = windows
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), w| {
                (lo.min(w.speed), hi.max(w.speed))
            });
        let range = (max_speed - min_speed).max(MIN_SPEED_RANGE);

        let stops = windows
            .iter()
            .enumerate()
            .map(|(k, window)| {
                let (start_idx, end_idx) = match self.alignment {
                    StopAlignment::Window => (window.start_idx, window.end_idx),
                    // windows.len() < sample_indices.len(), so k + 1 is in bounds
                    StopAlignment::Legacy => (sample_indices[k], sample_indices[k + 1]),
                };
                let mid_distance = (cumulative[end_idx] + cumulative[start_idx]) * 0.5;
                let normalized = (window.speed - min_speed) / range;

                GradientStop {
                    color: palette_color(&self.palette, normalized).unwrap_or(default_color),
                    position: mid_distance / total_distance,
                }
            })
            .collect();

        Gradient { stops }
    }

    /// Picks the first index at or past every `sample_distance_meters` step
    /// along the cumulative distance. Indices repeat when points are sparser
    /// than the sample spacing.
    ///
    /// Routes that would need more than `MAX_SAMPLE_COUNT` samples are sampled
    /// with a proportionally wider spacing.
    fn sample_indices(&self, cumulative: &[f64], total_distance: f64) -> Vec<usize> {
        let last = cumulative.len() - 1;
        let mut spacing = self.sample_distance_meters;
        let wanted = (total_distance / spacing).ceil() + 1.0;
        let sample_count = if wanted > MAX_SAMPLE_COUNT as f64 {
            spacing = total_distance / (MAX_SAMPLE_COUNT - 1) as f64;
            debug!(wanted, spacing, "route too long for sample spacing, widening");
            MAX_SAMPLE_COUNT
        } else {
            (wanted as usize).max(2)
        };

        let mut indices = Vec::with_capacity(sample_count);
        let mut target = 0.0;
        let mut j = 0;
        for _ in 0..sample_count {
            while j < last && cumulative[j] < target {
                j += 1;
            }
            indices.push(j.min(last));
            target += spacing;
        }
        indices
    }
}

/// Finite and at least [`MIN_SAMPLE_DISTANCE_METERS`].
pub fn is_valid_sample_distance(meters: f64) -> bool {
    meters.is_finite() && meters >= MIN_SAMPLE_DISTANCE_METERS
}

fn speed_windows(
    points: &[LocationSample],
    cumulative: &[f64],
    sample_indices: &[usize],
) -> Vec<SpeedWindow> {
    sample_indices
        .windows(2)
        .filter_map(|pair| {
            let (start_idx, end_idx) = (pair[0], pair[1]);
            if start_idx == end_idx {
                return None;
            }

            let distance = cumulative[end_idx] - cumulative[start_idx];
            let dt = (points[end_idx].timestamp - points[start_idx].timestamp).as_seconds_f64();
            if dt <= 0.0 {
                return None;
            }

            Some(SpeedWindow {
                start_idx,
                end_idx,
                speed: distance / dt,
            })
        })
        .collect()
}

fn palette_color(palette: &[Color], t: f64) -> Option<Color> {
    let last = palette.len().checked_sub(1)?;
    let clamped = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let index = (clamped * last as f64).round() as usize;
    palette.get(index.min(last)).copied()
}

/// Maps a normalized speed (0 = slowest, 1 = fastest) onto [`ROUTE_COLORS`],
/// rounding to the nearest of the eight entries.
pub fn color_for_normalized_speed(t: f64) -> Color {
    palette_color(&ROUTE_COLORS, t).unwrap_or(ROUTE_COLORS[0])
}

/// Speed gradient with the stock palette and window alignment.
pub fn heatmap_gradient(
    points: &[LocationSample],
    default_color: Color,
    sample_distance_meters: f64,
) -> Gradient {
    HeatmapGradientGenerator::default()
        .with_sample_distance(sample_distance_meters)
        .gradient(points, default_color)
}
