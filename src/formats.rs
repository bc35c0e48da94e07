/// Image format utilities and type-safe format handling
///
/// `ImageKind` is what a decoded image turned out to be, `ToolFormat` is the
/// tag used to pick a compression binary, and `ColorMode` names the pixel
/// layout stored in the image header.

use crate::constants::{JPEGOPTIM_BIN, PNGQUANT_BIN};
use crate::error::{CompressionError, Result};
use image::{ColorType, ImageFormat};
use std::fmt;
use std::str::FromStr;

/// Decoded image formats this crate accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Map a sniffed `image` crate format, rejecting everything but PNG and JPEG
    pub fn from_image_format(format: ImageFormat) -> Result<Self> {
        match format {
            ImageFormat::Png => Ok(ImageKind::Png),
            ImageFormat::Jpeg => Ok(ImageKind::Jpeg),
            other => Err(CompressionError::UnsupportedFormat(format!(
                "{:?} (only png and jpeg are accepted)",
                other
            ))),
        }
    }

    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
        }
    }

    /// Lowercase format name, as used in MIME types
    pub fn name(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Png => "PNG",
            ImageKind::Jpeg => "JPEG",
        };
        write!(f, "{}", name)
    }
}

/// Canonical format tag used to select a compression tool.
/// `jpeg` and `jpg` both collapse to `Jpg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFormat {
    Png,
    Jpg,
}

impl ToolFormat {
    pub fn tag(&self) -> &'static str {
        match self {
            ToolFormat::Png => "png",
            ToolFormat::Jpg => "jpg",
        }
    }

    pub fn binary_name(&self) -> &'static str {
        match self {
            ToolFormat::Png => PNGQUANT_BIN,
            ToolFormat::Jpg => JPEGOPTIM_BIN,
        }
    }
}

impl From<ImageKind> for ToolFormat {
    fn from(kind: ImageKind) -> Self {
        match kind {
            ImageKind::Png => ToolFormat::Png,
            ImageKind::Jpeg => ToolFormat::Jpg,
        }
    }
}

impl FromStr for ToolFormat {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ToolFormat::Png),
            "jpeg" | "jpg" => Ok(ToolFormat::Jpg),
            _ => Err(CompressionError::Configuration(format!(
                "cannot compress format '{}': only jpeg, jpg and png are accepted",
                s
            ))),
        }
    }
}

/// Pixel layout of an image header, named the way imaging tools usually
/// print it (`RGB`, `RGBA`, `L`, `P`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// 1-bit grayscale
    Bilevel,
    Gray,
    Gray16,
    GrayAlpha,
    /// Palette indices, as stored by indexed PNGs
    Palette,
    Rgb,
    Rgba,
    Unknown,
}

impl ColorMode {
    /// Reads the mode straight from a PNG IHDR, which keeps palette and
    /// bit-depth information the pixel decoder throws away.
    pub fn from_png_header(color: png::ColorType, depth: png::BitDepth) -> Self {
        match (color, depth) {
            (png::ColorType::Indexed, _) => ColorMode::Palette,
            (png::ColorType::Grayscale, png::BitDepth::One) => ColorMode::Bilevel,
            (png::ColorType::Grayscale, png::BitDepth::Sixteen) => ColorMode::Gray16,
            (png::ColorType::Grayscale, _) => ColorMode::Gray,
            (png::ColorType::GrayscaleAlpha, _) => ColorMode::GrayAlpha,
            (png::ColorType::Rgb, _) => ColorMode::Rgb,
            (png::ColorType::Rgba, _) => ColorMode::Rgba,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Bilevel => "1",
            ColorMode::Gray => "L",
            ColorMode::Gray16 => "I;16",
            ColorMode::GrayAlpha => "LA",
            ColorMode::Palette => "P",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::Unknown => "UNKNOWN",
        }
    }
}

impl From<ColorType> for ColorMode {
    fn from(color: ColorType) -> Self {
        match color {
            ColorType::L8 => ColorMode::Gray,
            ColorType::L16 => ColorMode::Gray16,
            ColorType::La8 | ColorType::La16 => ColorMode::GrayAlpha,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            _ => ColorMode::Unknown,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
