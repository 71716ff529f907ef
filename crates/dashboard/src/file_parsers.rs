//! Route import from GPX files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use time::OffsetDateTime;
use tracing::debug;

use crate::errors::DashboardError;
use crate::models::LocationSample;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to parse GPX file: {0}")]
    Gpx(String),
    #[error("No track points found in GPX file")]
    Empty,
}

/// Parse a GPX document into route samples.
///
/// Tracks and segments are flattened in file order. Points without a
/// timestamp cannot contribute to speed and are skipped.
pub fn parse_gpx(reader: impl Read) -> Result<Vec<LocationSample>, ParseError> {
    let gpx = gpx::read(reader).map_err(|e| ParseError::Gpx(e.to_string()))?;

    let mut samples = Vec::new();
    let mut total = 0usize;

    for track in &gpx.tracks {
        for seg in &track.segments {
            for pt in &seg.points {
                total += 1;
                let Some(time) = pt.time else {
                    continue;
                };
                let timestamp: OffsetDateTime = time.into();
                let point = pt.point();
                samples.push(LocationSample::new(point.y(), point.x(), timestamp));
            }
        }
    }

    if total == 0 {
        return Err(ParseError::Empty);
    }
    if samples.len() < total {
        debug!(
            skipped = total - samples.len(),
            total, "skipped GPX points without timestamps"
        );
    }

    Ok(samples)
}

/// Opens and parses a GPX route file.
pub fn load_route(path: impl AsRef<Path>) -> Result<Vec<LocationSample>, DashboardError> {
    let file = File::open(path.as_ref())?;
    Ok(parse_gpx(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const TRACK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="dashboard-tests" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning Run</name>
    <trkseg>
      <trkpt lat="40.0150000" lon="-105.2705000"><time>2025-10-30T07:00:00Z</time></trkpt>
      <trkpt lat="40.0160000" lon="-105.2695000"><time>2025-10-30T07:00:30Z</time></trkpt>
      <trkpt lat="40.0170000" lon="-105.2685000"></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="40.0180000" lon="-105.2675000"><time>2025-10-30T07:01:30Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

    #[test]
    fn test_parse_gpx() {
        let samples = parse_gpx(TRACK.as_bytes()).unwrap();

        assert_eq!(samples.len(), 3);
        assert!((samples[0].lat - 40.015).abs() < 1e-9);
        assert!((samples[0].lon + 105.2705).abs() < 1e-9);
        assert_eq!(samples[0].timestamp, datetime!(2025-10-30 07:00 UTC));
        assert_eq!(samples[2].timestamp, datetime!(2025-10-30 07:01:30 UTC));
    }

    #[test]
    fn test_parse_gpx_without_points() {
        let empty = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="dashboard-tests" xmlns="http://www.topografix.com/GPX/1/1">
</gpx>
"#;
        assert!(matches!(parse_gpx(empty.as_bytes()), Err(ParseError::Empty)));
    }

    #[test]
    fn test_load_route() {
        let path = std::env::temp_dir().join(format!("dashboard-route-{}.gpx", std::process::id()));
        std::fs::write(&path, TRACK).unwrap();
        let samples = load_route(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(samples.unwrap().len(), 3);

        assert!(matches!(
            load_route("/nonexistent/route.gpx"),
            Err(DashboardError::Io(_))
        ));
    }

    #[test]
    fn test_load_route_rejects_non_gpx() {
        let path = std::env::temp_dir().join(format!("dashboard-notes-{}.gpx", std::process::id()));
        std::fs::write(&path, "not xml").unwrap();
        let result = load_route(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(DashboardError::Parse(ParseError::Gpx(_)))));
    }

    #[test]
    fn test_parse_invalid_gpx() {
        assert!(matches!(
            parse_gpx("not xml".as_bytes()),
            Err(ParseError::Gpx(_))
        ));
    }
}
