use std::fmt;
use std::str::FromStr;

use crate::hyperspectral::common::error::HyperspectralError;

/// Per-sample storage format of a cube or raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    Gray8,
    Gray16Le,
    Gray16Be,
}

impl SampleFormat {
    pub fn byte_width(self) -> usize {
        match self {
            SampleFormat::Gray8 => 1,
            SampleFormat::Gray16Le | SampleFormat::Gray16Be => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SampleFormat::Gray8 => "GRAY8",
            SampleFormat::Gray16Le => "GRAY16_LE",
            SampleFormat::Gray16Be => "GRAY16_BE",
        }
    }

    /// Largest representable sample value.
    pub fn max_value(self) -> u32 {
        match self {
            SampleFormat::Gray8 => u8::MAX as u32,
            SampleFormat::Gray16Le | SampleFormat::Gray16Be => u16::MAX as u32,
        }
    }

    /// Decodes one sample stored in this format.
    pub fn read_sample(self, bytes: &[u8]) -> u16 {
        match self {
            SampleFormat::Gray8 => bytes[0] as u16,
            SampleFormat::Gray16Le => u16::from_le_bytes([bytes[0], bytes[1]]),
            SampleFormat::Gray16Be => u16::from_be_bytes([bytes[0], bytes[1]]),
        }
    }
}

impl FromStr for SampleFormat {
    type Err = HyperspectralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GRAY8" => Ok(SampleFormat::Gray8),
            "GRAY16_LE" => Ok(SampleFormat::Gray16Le),
            "GRAY16_BE" => Ok(SampleFormat::Gray16Be),
            other => Err(HyperspectralError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the cube is laid out in its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// One contiguous width x height plane per wavelength, in mosaic order
    #[default]
    Multiplane,
    /// One vector of all wavelengths per spatial pixel, pixels in raster order
    Interleaved,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Multiplane => "multiplane",
            Layout::Interleaved => "interleaved",
        }
    }
}

impl FromStr for Layout {
    type Err = HyperspectralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiplane" => Ok(Layout::Multiplane),
            "interleaved" => Ok(Layout::Interleaved),
            other => Err(HyperspectralError::UnknownLayout(other.to_string())),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
