//! GPS track replay engine: sanitizes recorded tracks, strips pauses,
//! builds elevation profiles, synthesizes virtual opponents and drives a
//! synchronized multi-track playback with an adaptive camera.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod replay;
pub mod routes;
pub mod state;
pub mod types;
