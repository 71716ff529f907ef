//! Fitness dashboard core.
//!
//! Turns workouts, routes, and health samples supplied by a
//! [`provider::HealthDataProvider`] into dashboard summaries, heart-rate zone
//! breakdowns, and speed heatmap gradients for route polylines.
//!
//! ```rust,ignore
//! use dashboard::prelude::*;
//!
//! let points = load_route("run.gpx")?;
//! let gradient = heatmap_gradient(&points, color::RUN, 50.0);
//! ```

pub mod color;
pub mod config;
pub mod errors;
pub mod file_parsers;
pub mod format;
pub mod heart_rate;
pub mod heatmap;
pub mod models;
pub mod provider;
pub mod route;
pub mod summary;
pub mod workouts;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::color::{self, Color, ROUTE_COLORS};
    pub use crate::config::DashboardConfig;
    pub use crate::errors::DashboardError;
    pub use crate::file_parsers::{load_route, parse_gpx};
    pub use crate::heatmap::{
        Gradient, GradientStop, HeatmapGradientGenerator, StopAlignment,
        color_for_normalized_speed, heatmap_gradient,
    };
    pub use crate::models::{LocationSample, Workout, WorkoutActivityType};
    pub use crate::provider::{HealthDataProvider, InMemoryProvider};
    pub use crate::route::{RouteMetrics, RouteRegion, score_route};
    pub use crate::summary::{Summary, SummaryAggregator, SummaryRange};
}
