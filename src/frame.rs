use image::RgbImage;
use std::time::Instant;

/// A single captured image sample, ready for the model.
#[derive(Clone, PartialEq)]
pub struct Frame {
    pub id: u64,
    pub image: RgbImage,
    pub captured_at: Instant,
}

impl Frame {
    pub fn new(id: u64, image: RgbImage) -> Self {
        Self {
            id,
            image,
            captured_at: Instant::now(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (width, height) = self.size();
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("size", &format!("{}x{}", width, height))
            .finish()
    }
}
