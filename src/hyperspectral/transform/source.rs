//! Source raster formats and plain 2-D sample views.

use std::fmt;
use std::str::FromStr;

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::SampleFormat;
use crate::hyperspectral::mosaic::DefaultMosaic;

/// Colour filter order of a Bayer sensor, read row-major over the 2x2 tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerOrder {
    Bggr,
    Rggb,
    Gbrg,
    Grbg,
}

impl BayerOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            BayerOrder::Bggr => "bggr",
            BayerOrder::Rggb => "rggb",
            BayerOrder::Gbrg => "gbrg",
            BayerOrder::Grbg => "grbg",
        }
    }

    pub fn default_mosaic(self) -> DefaultMosaic {
        match self {
            BayerOrder::Bggr => DefaultMosaic::Bggr,
            BayerOrder::Rggb => DefaultMosaic::Rggb,
            BayerOrder::Gbrg => DefaultMosaic::Gbrg,
            BayerOrder::Grbg => DefaultMosaic::Grbg,
        }
    }

    /// Recognises the order from the colour of each tile position
    /// (0 = red, 1 = green, 2 = blue), in row-major order.
    pub fn from_colors(colors: [usize; 4]) -> Option<Self> {
        match colors {
            [2, 1, 1, 0] => Some(BayerOrder::Bggr),
            [0, 1, 1, 2] => Some(BayerOrder::Rggb),
            [1, 2, 0, 1] => Some(BayerOrder::Gbrg),
            [1, 0, 2, 1] => Some(BayerOrder::Grbg),
            _ => None,
        }
    }
}

/// Pixel format of an encoder input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Gray(SampleFormat),
    /// 8 bits per sample
    Bayer(BayerOrder),
}

impl SourceFormat {
    /// Sample format of the cube produced from this source.
    pub fn sample_format(self) -> SampleFormat {
        match self {
            SourceFormat::Gray(format) => format,
            SourceFormat::Bayer(_) => SampleFormat::Gray8,
        }
    }

    pub fn byte_width(self) -> usize {
        self.sample_format().byte_width()
    }

    /// Mosaic used when none has been configured.
    pub fn default_mosaic(self) -> DefaultMosaic {
        match self {
            SourceFormat::Gray(_) => DefaultMosaic::Generic5x5,
            SourceFormat::Bayer(order) => order.default_mosaic(),
        }
    }
}

impl FromStr for SourceFormat {
    type Err = HyperspectralError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bggr" => Ok(SourceFormat::Bayer(BayerOrder::Bggr)),
            "rggb" => Ok(SourceFormat::Bayer(BayerOrder::Rggb)),
            "gbrg" => Ok(SourceFormat::Bayer(BayerOrder::Gbrg)),
            "grbg" => Ok(SourceFormat::Bayer(BayerOrder::Grbg)),
            other => other.parse::<SampleFormat>().map(SourceFormat::Gray),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Gray(format) => f.write_str(format.as_str()),
            SourceFormat::Bayer(order) => f.write_str(order.as_str()),
        }
    }
}

/// Declared geometry of the sensor raster fed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    pub width: usize,
    pub height: usize,
    pub format: SourceFormat,
}

impl SourceInfo {
    pub fn new(width: usize, height: usize, format: SourceFormat) -> Self {
        Self { width, height, format }
    }
}

fn check_raster(width: usize, height: usize, stride: usize, byte_width: usize, len: usize) -> Result<()> {
    if stride < width {
        return Err(HyperspectralError::GeometryMismatch(format!(
            "row stride {} is smaller than width {}",
            stride, width
        )));
    }
    let required = if height == 0 || width == 0 {
        0
    } else {
        (height - 1)
            .checked_mul(stride)
            .and_then(|rows| rows.checked_add(width))
            .and_then(|samples| samples.checked_mul(byte_width))
            .ok_or_else(|| {
                HyperspectralError::GeometryMismatch(format!(
                    "raster {}x{} with stride {} is too large",
                    width, height, stride
                ))
            })?
    };
    if len < required {
        return Err(HyperspectralError::InvalidSize { actual: len, required });
    }
    Ok(())
}

/// Read-only single-plane raster. `stride` is counted in samples.
#[derive(Debug, Clone, Copy)]
pub struct RasterImage<'a> {
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

impl<'a> RasterImage<'a> {
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Self {
        Self { data, width, height, stride: width }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub(crate) fn validate(&self, byte_width: usize) -> Result<()> {
        check_raster(self.width, self.height, self.stride, byte_width, self.data.len())
    }
}

/// Writable single-plane raster. `stride` is counted in samples.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    pub data: &'a mut [u8],
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

impl<'a> PlaneMut<'a> {
    pub fn new(data: &'a mut [u8], width: usize, height: usize) -> Self {
        Self { data, width, height, stride: width }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub(crate) fn validate(&self, byte_width: usize) -> Result<()> {
        check_raster(self.width, self.height, self.stride, byte_width, self.data.len())
    }
}
