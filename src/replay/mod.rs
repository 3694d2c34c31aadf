pub mod camera;
pub mod clock;
pub mod headless;
pub mod hooks;
pub mod interpolate;
pub mod ranking;
pub mod scheduler;
pub mod view;

pub use scheduler::{PlaybackPhase, PlaybackScheduler};
