//! Synthetic data for the fitness dashboard.
//!
//! Generates GPS routes with controllable pacing, a day's worth of health
//! samples, and GPX files, so heatmaps and summaries can be exercised without
//! a real health store.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let route = RouteGenerator::new()
//!     .with_distance(2000.0)
//!     .with_speed_plan([(0.5, 2.5), (1.0, 4.5)])
//!     .generate(&RunnerProfile::default(), &mut rng);
//!
//! let gradient = heatmap_gradient(&route, color::RUN, 50.0);
//! ```

pub mod gpx;
pub mod profiles;
pub mod routes;
pub mod samples;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::gpx::generate_gpx;
    pub use crate::profiles::{AthleteProfile, HikerProfile, RunnerProfile, sample_variance};
    pub use crate::routes::{BoundingBox, Region, RouteGenerator, RoutePattern, SpeedSegment};
    pub use crate::samples::{DaySamples, DaySamplesConfig};
    pub use dashboard::prelude::*;
    pub use rand::SeedableRng;
    pub use rand::rngs::StdRng;
}
