use dashboard::models::QuantityType;
use dashboard::summary::SummaryAggregator;
use test_data::prelude::*;
use time::Duration;
use time::macros::datetime;

const START: time::OffsetDateTime = datetime!(2025-10-30 07:00 UTC);

fn accelerating_route() -> Vec<LocationSample> {
    let mut rng = StdRng::seed_from_u64(21);
    RouteGenerator::new()
        .with_pattern(RoutePattern::Straight {
            heading_degrees: 0.0,
        })
        .with_start(40.015, -105.27)
        .with_gps_jitter(0.0)
        .with_point_spacing(10.0)
        .with_distance(1000.0)
        .with_start_time(START)
        .with_speed_plan([(0.5, 2.0), (1.0, 6.0)])
        .generate(&RunnerProfile::default(), &mut rng)
}

fn assert_well_formed(gradient: &Gradient) {
    let positions: Vec<f64> = gradient.stops.iter().map(|s| s.position).collect();
    assert!(positions.iter().all(|p| (0.0..=1.0).contains(p)));
    assert!(positions.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_accelerating_run_goes_from_cool_to_hot() {
    let route = accelerating_route();
    let gradient = heatmap_gradient(&route, color::RUN, 50.0);

    assert!(!gradient.is_solid());
    assert_well_formed(&gradient);

    let first = gradient.stops.first().unwrap();
    let last = gradient.stops.last().unwrap();
    assert_eq!(first.color, ROUTE_COLORS[0]);
    assert_eq!(last.color, ROUTE_COLORS[7]);
    assert!(first.position < 0.5 && last.position > 0.5);
}

#[test]
fn test_steady_pace_is_uniform() {
    let mut rng = StdRng::seed_from_u64(4);
    let route = RouteGenerator::new()
        .with_pattern(RoutePattern::Straight {
            heading_degrees: 45.0,
        })
        .with_start(37.32, -122.03)
        .with_gps_jitter(0.0)
        .with_distance(600.0)
        .with_start_time(START)
        .with_speed_plan([(1.0, 3.0)])
        .generate(&RunnerProfile::default(), &mut rng);

    // Equal speeds normalize to zero and all land on the slowest color.
    let gradient = heatmap_gradient(&route, color::RUN, 50.0);
    assert!(!gradient.stops.is_empty());
    assert!(gradient.colors().all(|c| c == ROUTE_COLORS[0]));
}

#[test]
fn test_random_routes_produce_ordered_stops() {
    let mut rng = StdRng::seed_from_u64(99);
    for distance in [300.0, 2500.0, 8000.0] {
        let route = RouteGenerator::new()
            .with_distance(distance)
            .generate(&HikerProfile::default(), &mut rng);

        for alignment in [StopAlignment::Window, StopAlignment::Legacy] {
            let gradient = HeatmapGradientGenerator::new()
                .with_alignment(alignment)
                .gradient(&route, color::HIKE);
            assert!(!gradient.stops.is_empty());
            assert_well_formed(&gradient);
        }
    }
}

#[test]
fn test_single_point_route_is_solid() {
    let route = vec![LocationSample::new(40.0, -105.0, START)];
    let gradient = heatmap_gradient(&route, color::RUN, 50.0);
    assert!(gradient.is_solid());
    assert_eq!(gradient.stops[0].color, color::RUN);
}

#[test]
fn test_gpx_round_trip_keeps_gradient() {
    let route = accelerating_route();
    let gpx = generate_gpx(&route, "Progression Run");
    let parsed = parse_gpx(gpx.as_slice()).unwrap();

    assert_eq!(parsed.len(), route.len());
    for (original, read) in route.iter().zip(&parsed) {
        assert!((original.lat - read.lat).abs() < 1e-6);
        assert!((original.lon - read.lon).abs() < 1e-6);
        assert!((original.timestamp - read.timestamp).abs() < Duration::milliseconds(1));
    }

    let before = heatmap_gradient(&route, color::RUN, 50.0);
    let after = heatmap_gradient(&parsed, color::RUN, 50.0);
    assert_eq!(before.stops.len(), after.stops.len());
    assert_eq!(before.stops.first().map(|s| s.color), after.stops.first().map(|s| s.color));
    assert_eq!(before.stops.last().map(|s| s.color), after.stops.last().map(|s| s.color));
}

#[tokio::test]
async fn test_generated_day_summary() {
    let mut rng = StdRng::seed_from_u64(8);
    let day_start = datetime!(2025-10-30 00:00 UTC);
    let now = datetime!(2025-10-30 20:00 UTC);

    let day = DaySamples::generate(&DaySamplesConfig::default(), day_start, now, &mut rng);
    let route = accelerating_route();
    let (Some(first), Some(last)) = (route.first(), route.last()) else {
        panic!("generated route is empty");
    };
    let workout = Workout::new(WorkoutActivityType::Running, first.timestamp, last.timestamp);

    let provider = InMemoryProvider::new();
    day.load_into(&provider);
    provider.add_workout(workout, route.clone());

    let summary = SummaryAggregator::new(provider)
        .fetch_summary(SummaryRange::Today, now)
        .await;

    let calories = day.total(QuantityType::ActiveEnergyBurned)
        + day.total(QuantityType::BasalEnergyBurned);
    assert_eq!(summary.calories_burned, Some(calories as i64));
    assert_eq!(summary.steps, Some(day.total(QuantityType::StepCount) as i64));
    assert_eq!(summary.resting_heart_rate, Some(58));
    assert!((summary.sleep_duration_seconds.unwrap() - 7.5 * 3600.0).abs() < 1e-6);

    let bucketed: f64 = summary.calorie_buckets.values().sum();
    assert!((bucketed - calories).abs() < 1e-6);

    // Hourly samples 00:30 through 19:30 in 3-hour buckets
    assert_eq!(summary.heart_rate_series.len(), 7);
    assert!(
        summary
            .heart_rate_series
            .iter()
            .all(|p| p.min_heart_rate <= p.max_heart_rate)
    );

    assert_eq!(summary.workouts.len(), 1);
    let run = &summary.workouts[0];
    assert!(run.route.unwrap().distance_meters > 990.0);
    let gradient = run.gradient.as_ref().unwrap();
    assert_eq!(gradient.stops.last().map(|s| s.color), Some(ROUTE_COLORS[7]));
}
