//! RAW image data types

use crate::hyperspectral::transform::{BayerOrder, RasterImage, SourceFormat, SourceInfo};
use crate::hyperspectral::cube::SampleFormat;

/// Represents decoded RAW image data
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Raw sensor samples, one per pixel
    pub data: Vec<u16>,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    /// Colour filter order of the sensor, when it is a 2x2 Bayer array
    pub cfa: Option<BayerOrder>,
}

impl RawImageData {
    /// Source description for the encoder: a 16-bit little-endian raster.
    pub fn source_info(&self) -> SourceInfo {
        SourceInfo::new(self.width, self.height, SourceFormat::Gray(SampleFormat::Gray16Le))
    }

    /// Samples serialised as 16-bit little-endian bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Raster view over bytes produced by [`RawImageData::to_le_bytes`].
    pub fn raster<'a>(&self, bytes: &'a [u8]) -> RasterImage<'a> {
        RasterImage::new(bytes, self.width, self.height)
    }
}
