//! GPX 1.1 output for generated routes.

use dashboard::models::LocationSample;
use time::format_description::well_known::Rfc3339;

/// Writes `points` as a single-track, single-segment GPX 1.1 document.
pub fn generate_gpx(points: &[LocationSample], activity_name: &str) -> Vec<u8> {
    let name = escape_xml(activity_name);
    let mut gpx = String::new();

    gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    gpx.push('\n');
    gpx.push_str(r#"<gpx version="1.1" creator="fitness-dashboard-test-data""#);
    gpx.push_str(r#" xmlns="http://www.topografix.com/GPX/1/1">"#);
    gpx.push('\n');

    gpx.push_str(&format!("  <metadata>\n    <name>{name}</name>\n  </metadata>\n"));
    gpx.push_str(&format!("  <trk>\n    <name>{name}</name>\n    <trkseg>\n"));

    for point in points {
        gpx.push_str(&format!(
            r#"      <trkpt lat="{:.7}" lon="{:.7}">"#,
            point.lat, point.lon
        ));
        if let Ok(ts) = point.timestamp.format(&Rfc3339) {
            gpx.push_str(&format!("<time>{ts}</time>"));
        }
        gpx.push_str("</trkpt>\n");
    }

    gpx.push_str("    </trkseg>\n  </trk>\n</gpx>\n");
    gpx.into_bytes()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
