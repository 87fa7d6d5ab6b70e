use crate::frame::Frame;
use crate::frame_source::interface::FrameSource;
use crate::library::logger::interface::Logger;
use image::imageops::{self, FilterType};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];

#[derive(Debug, Clone)]
pub struct ImageFilesConfig {
    pub dir: PathBuf,
    pub size: (u32, u32),
    pub flip: bool,
}

/// Replays still images from a directory as if they came from a camera,
/// looping forever.
pub struct FrameSourceImageFiles {
    config: ImageFilesConfig,
    files: Vec<PathBuf>,
    cursor: usize,
    started: bool,
    next_id: u64,
    latest: Option<Frame>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FrameSourceImageFiles {
    pub fn new(config: ImageFilesConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            files: Vec::new(),
            cursor: 0,
            started: false,
            next_id: 0,
            latest: None,
            logger: logger.with_namespace("camera").with_namespace("image_files"),
        }
    }

    fn is_image(path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

impl FrameSource for FrameSourceImageFiles {
    fn setup(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let entries = std::fs::read_dir(&self.config.dir).map_err(|e| {
            format!(
                "Cannot open frame directory {}: {}",
                self.config.dir.display(),
                e
            )
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && Self::is_image(&path) {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(format!("No images found in {}", self.config.dir.display()).into());
        }

        self.logger.info(&format!(
            "Found {} images in {}",
            files.len(),
            self.config.dir.display()
        ))?;
        self.files = files;
        self.cursor = 0;
        Ok(())
    }

    fn start(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.files.is_empty() {
            return Err("Camera has not been set up".into());
        }
        self.started = true;
        self.logger.info("Camera started")?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.started = false;
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame, Box<dyn Error + Send + Sync>> {
        if !self.started {
            return Err("Camera is not running".into());
        }

        let path = &self.files[self.cursor];
        self.cursor = (self.cursor + 1) % self.files.len();

        let decoded = image::open(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?
            .to_rgb8();

        let (width, height) = self.config.size;
        let mut image = imageops::resize(&decoded, width, height, FilterType::Triangle);
        if self.config.flip {
            imageops::flip_horizontal_in_place(&mut image);
        }

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
    use super::{FrameSourceImageFiles, ImageFilesConfig};
    use crate::frame_source::interface::FrameSource;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "live-classifier-frames-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_directory_fails_setup() {
        let mut source = FrameSourceImageFiles::new(
            ImageFilesConfig {
                dir: PathBuf::from("./no/such/frames"),
                size: (4, 4),
                flip: false,
            },
            Arc::new(LoggerFake::new()),
        );

        assert!(source.setup().is_err());
        assert!(source.start().is_err());
    }

    #[test]
    fn test_empty_directory_fails_setup() {
        let dir = temp_dir("empty");
        std::fs::write(dir.join("notes.txt"), "not an image").unwrap();

        let mut source = FrameSourceImageFiles::new(
            ImageFilesConfig {
                dir: dir.clone(),
                size: (4, 4),
                flip: false,
            },
            Arc::new(LoggerFake::new()),
        );

        assert!(source.setup().is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_replays_resized_and_mirrored() {
        let dir = temp_dir("replay");
        // Left half red, right half blue.
        let image = RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        image.save(dir.join("a.png")).unwrap();

        let mut source = FrameSourceImageFiles::new(
            ImageFilesConfig {
                dir: dir.clone(),
                size: (4, 4),
                flip: true,
            },
            Arc::new(LoggerFake::new()),
        );
        source.setup().unwrap();
        assert!(source.next_frame().is_err());
        source.start().unwrap();

        let first = source.next_frame().unwrap();
        let second = source.next_frame().unwrap();

        assert_eq!(first.size(), (4, 4));
        assert_eq!(second.id, 1);
        let left = first.image.get_pixel(0, 0);
        let right = first.image.get_pixel(3, 0);
        assert!(left[2] > 200 && left[0] < 50, "{:?}", left);
        assert!(right[0] > 200 && right[2] < 50, "{:?}", right);

        source.stop().unwrap();
        assert!(source.next_frame().is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
