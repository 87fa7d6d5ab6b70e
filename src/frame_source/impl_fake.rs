use crate::frame::Frame;
use crate::frame_source::interface::FrameSource;
use crate::library::logger::interface::Logger;
use image::{Rgb, RgbImage};
use rand::Rng;
use std::collections::VecDeque;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Call counters shared between a fake source and the test holding it.
#[derive(Debug, Clone, Default)]
pub struct FrameSourceFakeStats {
    pub setup_calls: usize,
    pub start_calls: usize,
    pub stop_calls: usize,
    pub next_frame_calls: usize,
}

/// Synthetic noise frames. Setup can be told to fail, and individual
/// captures can be scripted to fail.
pub struct FrameSourceFake {
    size: (u32, u32),
    setup_failure: Option<String>,
    capture_failures: VecDeque<bool>,
    next_id: u64,
    latest: Option<Frame>,
    stats: Arc<Mutex<FrameSourceFakeStats>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FrameSourceFake {
    pub fn new(size: (u32, u32), logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            size,
            setup_failure: None,
            capture_failures: VecDeque::new(),
            next_id: 0,
            latest: None,
            stats: Arc::new(Mutex::new(FrameSourceFakeStats::default())),
            logger: logger.with_namespace("camera").with_namespace("fake"),
        }
    }

    #[allow(dead_code)]
    pub fn failing_setup(mut self, message: &str) -> Self {
        self.setup_failure = Some(message.to_string());
        self
    }

    /// `true` entries make the matching capture fail, in call order.
    #[allow(dead_code)]
    pub fn with_capture_failures(mut self, failures: Vec<bool>) -> Self {
        self.capture_failures = failures.into();
        self
    }

    #[allow(dead_code)]
    pub fn stats(&self) -> Arc<Mutex<FrameSourceFakeStats>> {
        Arc::clone(&self.stats)
    }

    fn record<F: FnOnce(&mut FrameSourceFakeStats)>(&self, f: F) {
        if let Ok(mut stats) = self.stats.lock() {
            f(&mut stats);
        }
    }
}

impl FrameSource for FrameSourceFake {
    fn setup(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.record(|s| s.setup_calls += 1);
        self.logger.info("Setting up camera...")?;
        if let Some(message) = &self.setup_failure {
            return Err(message.clone().into());
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.record(|s| s.start_calls += 1);
        self.logger.info("Camera started")?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.record(|s| s.stop_calls += 1);
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame, Box<dyn Error + Send + Sync>> {
        self.record(|s| s.next_frame_calls += 1);

        if self.capture_failures.pop_front().unwrap_or(false) {
            return Err("Capture device lost".into());
        }

        let mut rng = rand::rng();
        let (width, height) = self.size;
        let image = RgbImage::from_fn(width, height, |_, _| {
            Rgb([rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()])
        });

        let frame = Frame::new(self.next_id, image);
        self.next_id += 1;
        self.latest = Some(frame.clone());
        Ok(frame)
    }

    fn surface(&self) -> Option<&Frame> {
        self.latest.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::FrameSourceFake;
    use crate::frame_source::interface::FrameSource;
    use crate::library::logger::impl_fake::LoggerFake;
    use std::sync::Arc;

    #[test]
    fn test_frames_have_configured_size_and_increasing_ids() {
        let mut source = FrameSourceFake::new((8, 6), Arc::new(LoggerFake::new()));
        source.setup().unwrap();
        source.start().unwrap();

        let first = source.next_frame().unwrap();
        let second = source.next_frame().unwrap();

        assert_eq!(first.size(), (8, 6));
        assert_eq!(first.id, 0);
        assert_eq!(second.id, 1);
        assert_eq!(source.surface().map(|f| f.id), Some(1));
    }

    #[test]
    fn test_scripted_capture_failures() {
        let source = FrameSourceFake::new((2, 2), Arc::new(LoggerFake::new()))
            .with_capture_failures(vec![false, true]);
        let stats = source.stats();
        let mut source = source;

        assert!(source.next_frame().is_ok());
        assert!(source.next_frame().is_err());
        assert!(source.next_frame().is_ok());
        assert_eq!(stats.lock().unwrap().next_frame_calls, 3);
    }

    #[test]
    fn test_failing_setup() {
        let mut source = FrameSourceFake::new((2, 2), Arc::new(LoggerFake::new()))
            .failing_setup("Permission denied");

        let result = source.setup();

        assert_eq!(result.unwrap_err().to_string(), "Permission denied");
    }
}
