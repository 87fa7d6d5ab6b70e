use crate::frame::Frame;
use std::error::Error;

pub trait FrameSource: Send {
    /// Acquire the device. Fails when it is missing or access is denied.
    fn setup(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn start(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn stop(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Runs the device's update step, then returns the freshly captured frame.
    fn next_frame(&mut self) -> Result<Frame, Box<dyn Error + Send + Sync>>;

    /// The most recent frame, for drawing next to the predictions.
    fn surface(&self) -> Option<&Frame>;
}
