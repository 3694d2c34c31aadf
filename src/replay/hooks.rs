use crate::error::CaptureError;

/// Screen or video capture wrapped around the running phase.
pub trait Recorder {
    fn start(&mut self) -> Result<(), CaptureError>;
    fn stop(&mut self) -> Result<Vec<u8>, CaptureError>;
}

/// Audible countdown and soundtrack control.
pub trait AudioCue {
    fn countdown_tick(&mut self, remaining: u8);
    fn pause(&mut self) {}
}
