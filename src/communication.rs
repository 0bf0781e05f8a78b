use crate::audio::{AdhanPlan, Schedule};

/// Requests from the ui thread to the audio worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// open the output device if it isn't already, sent on user interaction
    Unlock,
    Tones(Schedule),
    /// replaces whatever adhan is currently playing
    Adhan(AdhanPlan),
    /// silence everything and drop pending tones
    Stop,
    Shutdown,
}
