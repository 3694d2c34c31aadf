use serde::{Deserialize, Serialize};

/// A raw GPS fix as read from an uploaded file. Nothing here is validated yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
    /// ISO-8601 timestamp exactly as it appeared in the source.
    pub time: Option<String>,
    pub heart_rate: Option<u16>,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64, elevation: f64, time: Option<String>) -> Self {
        Self {
            lat,
            lon,
            elevation,
            time,
            heart_rate: None,
        }
    }
}

/// A validated point with a resolved timeline position.
///
/// `t` is epoch milliseconds when the track carried real timestamps and
/// milliseconds since the first point when timing was synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
    pub time: Option<String>,
    pub heart_rate: Option<u16>,
    pub t: i64,
}

impl SanitizedPoint {
    pub fn from_raw(point: &TrackPoint, t: i64) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
            elevation: point.elevation,
            time: point.time.clone(),
            heart_rate: point.heart_rate,
            t,
        }
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn around(center: LatLon) -> Self {
        Self {
            south: center.lat,
            west: center.lon,
            north: center.lat,
            east: center.lon,
        }
    }

    pub fn from_positions<I: IntoIterator<Item = LatLon>>(positions: I) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::around(first);
        for pos in iter {
            bounds.extend(pos);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, pos: LatLon) {
        self.south = self.south.min(pos.lat);
        self.north = self.north.max(pos.lat);
        self.west = self.west.min(pos.lon);
        self.east = self.east.max(pos.lon);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    pub fn center(&self) -> LatLon {
        LatLon::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn contains(&self, pos: LatLon) -> bool {
        pos.lat >= self.south && pos.lat <= self.north && pos.lon >= self.west && pos.lon <= self.east
    }

    /// Shrinks every edge towards the center by `ratio` of the span (0.2 trims 20% per side).
    pub fn inset(&self, ratio: f64) -> Bounds {
        let ratio = ratio.clamp(0.0, 0.49);
        let dlat = self.lat_span() * ratio;
        let dlon = self.lon_span() * ratio;
        Bounds {
            south: self.south + dlat,
            west: self.west + dlon,
            north: self.north - dlat,
            east: self.east - dlon,
        }
    }

    /// Grows the narrower dimension so the box matches a width/height aspect ratio.
    /// Longitude spans are corrected by the cosine of the center latitude.
    pub fn fit_aspect(&self, aspect_ratio: f64) -> Bounds {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return *self;
        }
        let center = self.center();
        let lon_scale = center.lat.to_radians().cos().max(1e-6);
        let width = self.lon_span() * lon_scale;
        let height = self.lat_span();
        if width <= 0.0 && height <= 0.0 {
            return *self;
        }
        let (width, height) = if width > height * aspect_ratio {
            (width, width / aspect_ratio)
        } else {
            (height * aspect_ratio, height)
        };
        let half_lat = height / 2.0;
        let half_lon = width / lon_scale / 2.0;
        Bounds {
            south: center.lat - half_lat,
            west: center.lon - half_lon,
            north: center.lat + half_lat,
            east: center.lon + half_lon,
        }
    }
}

/// A span of the track identified as standing still.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseInterval {
    /// Track time in ms before compression.
    pub start_abs: i64,
    pub end_abs: i64,
    pub duration_ms: i64,
    pub anchor: LatLon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub duration_seconds: u64,
    pub avg_speed_kmh: f64,
    pub avg_heart_rate: Option<u16>,
    pub max_heart_rate: Option<u16>,
}

/// Raw points plus display metadata, as delivered by a parser or the track store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSource {
    pub name: String,
    pub color: String,
    pub points: Vec<TrackPoint>,
}

/// A track ready for display and playback. Every derived field is rebuilt
/// from `raw` whenever the raw points or the pause options change.
#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    pub color: String,
    pub raw: Vec<TrackPoint>,
    pub points: Vec<SanitizedPoint>,
    pub cumulative: Vec<f64>,
    pub total_distance: f64,
    pub pauses: Vec<PauseInterval>,
    pub synthetic_timing: bool,
    pub metrics: Metrics,
}

impl Track {
    /// Whether the track has enough sanitized points to be drawn or animated.
    pub fn has(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn start_t(&self) -> Option<i64> {
        self.points.first().map(|p| p.t)
    }

    pub fn end_t(&self) -> Option<i64> {
        self.points.last().map(|p| p.t)
    }

    pub fn duration_ms(&self) -> i64 {
        match (self.start_t(), self.end_t()) {
            (Some(start), Some(end)) => end - start,
            _ => 0,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        if !self.has() {
            return None;
        }
        Bounds::from_positions(self.points.iter().map(SanitizedPoint::position))
    }
}
