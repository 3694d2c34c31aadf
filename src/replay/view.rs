use serde::Serialize;

use crate::types::track::{Bounds, LatLon};

/// What the map surface currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub bounds: Bounds,
    pub zoom: f64,
    /// True while a camera animation is still in flight.
    pub moving: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraCommand {
    FitBounds { bounds: Bounds, duration_ms: f64 },
    FlyTo { center: LatLon, zoom: f64, duration_ms: f64 },
}

/// Translates camera commands into calls on a concrete rendering surface.
pub trait ViewAdapter {
    /// `None` until the surface exists; callers treat that as "do nothing".
    fn viewport(&self) -> Option<Viewport>;
    fn apply(&mut self, command: &CameraCommand);
}

/// Surface without pixels: commands land instantly and the viewport is
/// derived from a web-mercator-like zoom scale.
#[derive(Debug, Clone)]
pub struct HeadlessView {
    viewport: Option<Viewport>,
    aspect_ratio: f64,
}

impl HeadlessView {
    pub fn new(aspect_ratio: f64) -> Self {
        Self {
            viewport: None,
            aspect_ratio: if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
                aspect_ratio
            } else {
                1.0
            },
        }
    }

    fn bounds_for(&self, center: LatLon, zoom: f64) -> Bounds {
        let lon_span = 360.0 / 2f64.powf(zoom);
        let lat_span = lon_span / self.aspect_ratio * center.lat.to_radians().cos().abs().max(1e-6);
        Bounds {
            south: center.lat - lat_span / 2.0,
            west: center.lon - lon_span / 2.0,
            north: center.lat + lat_span / 2.0,
            east: center.lon + lon_span / 2.0,
        }
    }
}

impl ViewAdapter for HeadlessView {
    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn apply(&mut self, command: &CameraCommand) {
        let viewport = match *command {
            CameraCommand::FitBounds { bounds, .. } => {
                let lon_span = bounds.lon_span().max(1e-9);
                Viewport {
                    bounds,
                    zoom: (360.0 / lon_span).log2(),
                    moving: false,
                }
            }
            CameraCommand::FlyTo { center, zoom, .. } => Viewport {
                bounds: self.bounds_for(center, zoom),
                zoom,
                moving: false,
            },
        };
        self.viewport = Some(viewport);
    }
}
