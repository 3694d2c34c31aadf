use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::pipeline::parse::{ParsedTrack, Parser};
use crate::types::track::TrackPoint;

pub struct GpxParser;

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedTrack, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut points = Vec::new();
        let mut name: Option<String> = None;
        let mut in_trk = false;
        let mut current_point: Option<TrackPoint> = None;
        let mut current_element = String::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let local = local_name(&e)?;
                    match local.as_str() {
                        "trk" => in_trk = true,
                        "trkpt" => current_point = point_from_attributes(&e)?,
                        _ => current_element = local,
                    }
                }
                Ok(Event::Empty(e)) => {
                    if local_name(&e)? == "trkpt" {
                        if let Some(point) = point_from_attributes(&e)? {
                            points.push(point);
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                    if let Some(point) = current_point.as_mut() {
                        match current_element.as_str() {
                            "ele" => point.elevation = text.trim().parse().unwrap_or(0.0),
                            "time" => point.time = Some(text.trim().to_string()),
                            "hr" => point.heart_rate = text.trim().parse().ok(),
                            _ => {}
                        }
                    } else if in_trk && current_element == "name" && name.is_none() {
                        name = Some(text.trim().to_string());
                    }
                }
                Ok(Event::End(e)) => {
                    let local = e.local_name();
                    let local = std::str::from_utf8(local.as_ref())
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                    match local {
                        "trkpt" => {
                            if let Some(point) = current_point.take() {
                                points.push(point);
                            }
                        }
                        "trk" => in_trk = false,
                        _ => {}
                    }
                    current_element.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if points.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(ParsedTrack { name, points })
    }
}

fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    let local = e.local_name();
    std::str::from_utf8(local.as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::InvalidGpx(e.to_string()))
}

fn point_from_attributes(e: &BytesStart<'_>) -> Result<Option<TrackPoint>, ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

        match key {
            "lat" => lat = value.trim().parse::<f64>().ok(),
            "lon" => lon = value.trim().parse::<f64>().ok(),
            _ => {}
        }
    }

    Ok(match (lat, lon) {
        (Some(lat), Some(lon)) => Some(TrackPoint::new(lat, lon, 0.0, None)),
        _ => None,
    })
}
