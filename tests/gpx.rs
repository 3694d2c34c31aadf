use trackreplay_rs::error::ParseError;
use trackreplay_rs::pipeline::export::to_gpx;
use trackreplay_rs::pipeline::parse::{parse, parse_or_empty};
use trackreplay_rs::types::track::TrackPoint;

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1"
     xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1">
  <metadata><name>Not the track name</name></metadata>
  <trk>
    <name>Morning Climb</name>
    <trkseg>
      <trkpt lat="46.500000" lon="7.250000">
        <ele>612.4</ele>
        <time>2026-01-01T08:00:00Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>131</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
      <trkpt lat="46.500900" lon="7.250000">
        <ele>615.0</ele>
        <time>2026-01-01T08:00:20Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>138</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
      <trkpt lat="46.501800" lon="7.250000"/>
    </trkseg>
  </trk>
</gpx>"#;

#[test]
fn parses_points_elevation_time_and_heart_rate() {
    let parsed = parse(SAMPLE.as_bytes()).expect("parse");

    assert_eq!(parsed.name.as_deref(), Some("Morning Climb"));
    assert_eq!(parsed.points.len(), 3);

    let first = &parsed.points[0];
    assert_eq!(first.lat, 46.5);
    assert_eq!(first.lon, 7.25);
    assert_eq!(first.elevation, 612.4);
    assert_eq!(first.time.as_deref(), Some("2026-01-01T08:00:00Z"));
    assert_eq!(first.heart_rate, Some(131));
    assert_eq!(parsed.points[1].heart_rate, Some(138));
}

#[test]
fn missing_children_fall_back_to_defaults() {
    let parsed = parse(SAMPLE.as_bytes()).expect("parse");
    let bare = &parsed.points[2];

    assert_eq!(bare.elevation, 0.0);
    assert_eq!(bare.time, None);
    assert_eq!(bare.heart_rate, None);
}

#[test]
fn points_without_coordinates_are_skipped() {
    let gpx = r#"<gpx><trk><trkseg>
        <trkpt lat="46.5"><ele>1</ele></trkpt>
        <trkpt lat="46.5" lon="7.25"><ele>2</ele></trkpt>
    </trkseg></trk></gpx>"#;
    let parsed = parse(gpx.as_bytes()).expect("parse");

    assert_eq!(parsed.points.len(), 1);
    assert_eq!(parsed.points[0].elevation, 2.0);
}

#[test]
fn document_without_points_is_empty_file() {
    let gpx = r#"<gpx><trk><name>Nothing</name><trkseg></trkseg></trk></gpx>"#;
    assert!(matches!(parse(gpx.as_bytes()), Err(ParseError::EmptyFile)));
}

#[test]
fn malformed_input_degrades_to_empty_track() {
    let broken = b"<gpx><trk><trkseg><trkpt lat=\"46.5\" lon=\"7.25\"></trk></gpx>";
    assert!(parse(broken).is_err());

    let parsed = parse_or_empty(broken);
    assert!(parsed.points.is_empty());
    assert!(parsed.name.is_none());
}

#[test]
fn export_is_readable_by_the_parser() {
    let points = vec![
        TrackPoint {
            heart_rate: Some(120),
            ..TrackPoint::new(46.5, 7.25, 600.0, Some("2026-01-01T08:00:00Z".to_string()))
        },
        TrackPoint::new(46.501, 7.2505, 603.5, Some("2026-01-01T08:00:30Z".to_string())),
        TrackPoint::new(46.502, 7.251, 0.0, None),
    ];

    let bytes = to_gpx("Lake & Back", &points).expect("export");
    let text = String::from_utf8(bytes.clone()).expect("utf8");
    assert!(text.contains("<gpxtpx:hr>120</gpxtpx:hr>"));
    assert!(text.contains("Lake &amp; Back"));

    let parsed = parse(&bytes).expect("re-parse");
    assert_eq!(parsed.name.as_deref(), Some("Lake & Back"));
    assert_eq!(parsed.points, points);
}
