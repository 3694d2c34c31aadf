mod gpx;

use crate::error::ParseError;
use crate::types::track::TrackPoint;

pub use gpx::GpxParser;

#[derive(Debug, Clone, Default)]
pub struct ParsedTrack {
    pub name: Option<String>,
    pub points: Vec<TrackPoint>,
}

pub trait Parser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedTrack, ParseError>;
}

pub fn parse(bytes: &[u8]) -> Result<ParsedTrack, ParseError> {
    GpxParser.parse(bytes)
}

/// Parses, degrading any failure to an empty track so callers can flag it as unusable.
pub fn parse_or_empty(bytes: &[u8]) -> ParsedTrack {
    match parse(bytes) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("Treating unreadable track as empty: {}", err);
            ParsedTrack::default()
        }
    }
}
