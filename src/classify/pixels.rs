//! Converts a decoded photo into the fixed-size pixel input a model expects.

use std::path::{Path, PathBuf};

use image::{DynamicImage, imageops::FilterType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Channel layout a model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Rgb,
    Grayscale,
}

impl ColorMode {
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Grayscale => 1,
        }
    }
}

/// Input image shape required by a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConstraint {
    pub width: u32,
    pub height: u32,
    pub color: ColorMode,
}

impl ImageConstraint {
    /// Number of `f32` values in a matching [`PixelInput`], or `None` when it
    /// does not fit in `usize`.
    pub fn feature_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.color.channels())
    }
}

/// Row-major, channel-interleaved pixels with raw `0..=255` values.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelInput {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub data: Vec<f32>,
}

/// Errors raised while building a [`PixelInput`].
#[derive(Debug, Error)]
pub enum PixelInputError {
    #[error("Source image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("Model input constraint has zero size ({width}x{height})")]
    EmptyConstraint { width: u32, height: u32 },
    #[error("Model input constraint is too large ({width}x{height})")]
    ConstraintTooLarge { width: u32, height: u32 },
    #[error("No classifier model is loaded")]
    NoModel,
}

/// A picked file that could not be opened or decoded.
#[derive(Debug, Error)]
#[error("Failed to load image {path}: {source}")]
pub struct ImageLoadError {
    pub path: PathBuf,
    pub source: image::ImageError,
}

/// Open and decode an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageLoadError> {
    image::open(path).map_err(|source| ImageLoadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Scale-fill `image` to the constraint's exact size and flatten it.
///
/// Aspect ratio is not preserved.
pub fn pixel_input(
    image: &DynamicImage,
    constraint: ImageConstraint,
) -> Result<PixelInput, PixelInputError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PixelInputError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    if constraint.width == 0 || constraint.height == 0 {
        return Err(PixelInputError::EmptyConstraint {
            width: constraint.width,
            height: constraint.height,
        });
    }
    if constraint.feature_len().is_none() {
        return Err(PixelInputError::ConstraintTooLarge {
            width: constraint.width,
            height: constraint.height,
        });
    }
    let resized = image.resize_exact(constraint.width, constraint.height, FilterType::Triangle);
    let data: Vec<f32> = match constraint.color {
        ColorMode::Rgb => resized
            .to_rgb8()
            .into_raw()
            .into_iter()
            .map(f32::from)
            .collect(),
        ColorMode::Grayscale => resized
            .to_luma8()
            .into_raw()
            .into_iter()
            .map(f32::from)
            .collect(),
    };
    Ok(PixelInput {
        width: constraint.width,
        height: constraint.height,
        channels: constraint.color.channels(),
        data,
    })
}
