use super::ImageError;
use ::image::imageops::FilterType;
use ::image::DynamicImage;
use std::path::Path;

/// Image primitives used by [`ImageMaker`](super::ImageMaker).
pub trait ImageProcessor: Send + Sync {
    type Image;

    fn open(&self, path: &Path) -> Result<Self::Image, ImageError>;

    /// Resizes to `width` x `height`, or to `width` with the aspect ratio kept when `height`
    /// is `None`.
    fn resize(&self, image: &Self::Image, width: u32, height: Option<u32>) -> Self::Image;

    fn save(&self, image: &Self::Image, path: &Path) -> Result<(), ImageError>;
}

/// Default backend on top of the `image` crate. The output format follows the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterProcessor;

impl ImageProcessor for RasterProcessor {
    type Image = DynamicImage;

    fn open(&self, path: &Path) -> Result<DynamicImage, ImageError> {
        Ok(::image::open(path)?)
    }

    fn resize(&self, image: &DynamicImage, width: u32, height: Option<u32>) -> DynamicImage {
        match height {
            Some(height) => image.resize_exact(width, height, FilterType::Lanczos3),
            None => image.resize(width, u32::MAX, FilterType::Lanczos3),
        }
    }

    fn save(&self, image: &DynamicImage, path: &Path) -> Result<(), ImageError> {
        Ok(image.save(path)?)
    }
}
