//! # Image uploads
//!
//! Turns an uploaded image into one or more resized files under the public directory and
//! rewrites the request field to point at the result, before the request reaches `store`.

pub mod path;
pub mod processor;

pub use path::{collapse_slashes, is_absolute_path};
pub use processor::{ImageProcessor, RasterProcessor};

use crate::controller::Request;
use chrono::Utc;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub const XL: (u32, u32) = (1920, 1080);
pub const L: (u32, u32) = (1280, 800);
pub const S: (u32, u32) = (600, 400);
pub const ALL_SIZES: [(u32, u32); 3] = [XL, L, S];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("You must provide full path to image resource. Path can't be empty")]
    EmptyPath,
    #[error("Path can not have non-printable characters or be empty: {0}")]
    NonPrintablePath(String),
    #[error("Invalid image size `{0}`, expected `width, height`")]
    InvalidSize(String),
    #[error("Provided image path: {0} is not valid or doesn't exist")]
    PathNotFound(String),
    #[error(transparent)]
    Processing(#[from] ::image::ImageError),
}

/// Target dimensions for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSize {
    /// One file, named after the upload time.
    Single { width: u32, height: u32 },
    /// One file per size, named `<name>-<w>-<h>.<ext>`.
    Multi(Vec<(u32, u32)>),
}

impl ImageSize {
    pub fn all() -> Self {
        ImageSize::Multi(ALL_SIZES.to_vec())
    }

    pub fn parse_many<'a>(sizes: impl IntoIterator<Item = &'a str>) -> Result<Self, ImageError> {
        let sizes = sizes
            .into_iter()
            .map(parse_dimensions)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ImageSize::Multi(sizes))
    }
}

impl FromStr for ImageSize {
    type Err = ImageError;

    /// Parses `"1280, 800"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = parse_dimensions(s)?;
        Ok(ImageSize::Single { width, height })
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSize::Single { width, height } => write!(f, "{width}, {height}"),
            ImageSize::Multi(sizes) => {
                let sizes: Vec<String> = sizes.iter().map(|(w, h)| format!("{w}, {h}")).collect();
                write!(f, "[{}]", sizes.join("; "))
            }
        }
    }
}

fn parse_dimensions(s: &str) -> Result<(u32, u32), ImageError> {
    let invalid = || ImageError::InvalidSize(s.to_string());
    let (width, height) = s.trim().split_once(',').ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}

pub struct ImageMaker<P: ImageProcessor = RasterProcessor> {
    public_root: PathBuf,
    processor: P,
}

impl ImageMaker<RasterProcessor> {
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self::with_processor(public_root, RasterProcessor)
    }
}

impl<P: ImageProcessor> ImageMaker<P> {
    pub fn with_processor(public_root: impl Into<PathBuf>, processor: P) -> Self {
        Self {
            public_root: public_root.into(),
            processor,
        }
    }

    /// Absolute, slash-collapsed form of `path`. Relative paths live under the public root.
    pub fn resolve(&self, path: &str) -> Result<String, ImageError> {
        if path.is_empty() {
            return Err(ImageError::EmptyPath);
        }
        let path = if is_absolute_path(path)? {
            path.to_string()
        } else {
            format!("{}/{}", self.public_root.display(), path)
        };
        let path = collapse_slashes(&path);
        if !Path::new(&path).exists() {
            return Err(ImageError::PathNotFound(path));
        }
        Ok(path)
    }

    /// Resizes the file uploaded under `field` into `path` and points the field at the result.
    ///
    /// `path` is a directory prefix; generated names are appended to it as is. Without an
    /// uploaded file, or without a `size`, the field is set to an empty string. Returns the
    /// value written to the field.
    pub fn make_image(
        &self,
        request: &mut Request,
        field: &str,
        path: &str,
        size: Option<&ImageSize>,
        scale: bool,
        name: Option<&str>,
    ) -> Result<String, ImageError> {
        let path = self.resolve(path)?;

        let (upload, size) = match (request.file(field).cloned(), size) {
            (Some(upload), Some(size)) => (upload, size),
            _ => {
                debug!(field, "No image to build");
                request.set(field, "");
                return Ok(String::new());
            }
        };

        let extension = match upload.extension() {
            "" => "png",
            ext => ext,
        };
        let stamp = Utc::now().timestamp().to_string();
        let original = self.processor.open(upload.path())?;

        let value = match size {
            ImageSize::Single { width, height } => {
                let target = collapse_slashes(&format!("{path}{stamp}.{extension}"));
                let height = (!scale).then_some(*height);
                let resized = self.processor.resize(&original, *width, height);
                self.processor.save(&resized, Path::new(&target))?;
                info!(field, target = %target, "Image saved");
                path
            }
            ImageSize::Multi(sizes) => {
                let prefix = name.filter(|n| !n.is_empty()).unwrap_or(stamp.as_str());
                let mut last = String::new();
                for (width, height) in sizes {
                    let file_name = format!("{prefix}-{width}-{height}.{extension}");
                    let target = collapse_slashes(&format!("{path}{file_name}"));
                    let height = (!scale).then_some(*height);
                    let resized = self.processor.resize(&original, *width, height);
                    self.processor.save(&resized, Path::new(&target))?;
                    info!(field, target = %target, "Image saved");
                    last = file_name;
                }
                last
            }
        };

        request.set(field, value.as_str());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sizes() {
        assert_eq!(
            "1920, 1080".parse::<ImageSize>().unwrap(),
            ImageSize::Single {
                width: 1920,
                height: 1080
            }
        );
        assert_eq!(
            ImageSize::parse_many(["600,400", " 1280 , 800 "]).unwrap(),
            ImageSize::Multi(vec![S, L])
        );
        assert!(matches!(
            "1920x1080".parse::<ImageSize>(),
            Err(ImageError::InvalidSize(_))
        ));
        assert_eq!(ImageSize::all(), ImageSize::Multi(vec![XL, L, S]));
    }
}
