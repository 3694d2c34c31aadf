use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::ExportError;
use crate::types::track::TrackPoint;

const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";
const TPX_NS: &str = "http://www.garmin.com/xmlschemas/TrackPointExtension/v1";

/// Serializes raw points back into a GPX 1.1 document readable by the parser.
pub fn to_gpx(name: &str, points: &[TrackPoint]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", "1.1"));
    root.push_attribute(("creator", "trackreplay-rs"));
    root.push_attribute(("xmlns", GPX_NS));
    root.push_attribute(("xmlns:gpxtpx", TPX_NS));
    write(&mut writer, Event::Start(root))?;
    write(&mut writer, Event::Start(BytesStart::new("trk")))?;
    text_element(&mut writer, "name", name)?;
    write(&mut writer, Event::Start(BytesStart::new("trkseg")))?;

    for point in points {
        let lat = format!("{:.6}", point.lat);
        let lon = format!("{:.6}", point.lon);
        let mut trkpt = BytesStart::new("trkpt");
        trkpt.push_attribute(("lat", lat.as_str()));
        trkpt.push_attribute(("lon", lon.as_str()));
        write(&mut writer, Event::Start(trkpt))?;

        text_element(&mut writer, "ele", &format!("{:.1}", point.elevation))?;
        if let Some(time) = point.time.as_deref() {
            text_element(&mut writer, "time", time)?;
        }
        if let Some(hr) = point.heart_rate {
            write(&mut writer, Event::Start(BytesStart::new("extensions")))?;
            write(&mut writer, Event::Start(BytesStart::new("gpxtpx:TrackPointExtension")))?;
            text_element(&mut writer, "gpxtpx:hr", &hr.to_string())?;
            write(&mut writer, Event::End(BytesEnd::new("gpxtpx:TrackPointExtension")))?;
            write(&mut writer, Event::End(BytesEnd::new("extensions")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("trkpt")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("trkseg")))?;
    write(&mut writer, Event::End(BytesEnd::new("trk")))?;
    write(&mut writer, Event::End(BytesEnd::new("gpx")))?;

    Ok(writer.into_inner())
}

fn text_element(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<(), ExportError> {
    write(writer, Event::Start(BytesStart::new(tag)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(tag)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ExportError> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::Xml(e.to_string()))
}
