//! Transcoding configuration types

use std::path::PathBuf;

use crate::hyperspectral::common::error::Result;
use crate::hyperspectral::cube::Layout;
use crate::hyperspectral::export::BandImageFormat;
use crate::hyperspectral::mosaic::{DefaultMosaic, TiledMosaic};
use crate::hyperspectral::transform::BayerOrder;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Where the encoder mosaic comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MosaicSource {
    /// Bayer default matching the sensor CFA, or the source format default
    #[default]
    Auto,
    Default(DefaultMosaic),
    /// `W,H=row:row:...`
    Text(String),
    /// File holding the text form
    File(PathBuf),
}

impl MosaicSource {
    /// Loads the mosaic. `None` leaves the choice to the encoder's source
    /// format default.
    pub fn resolve(&self, cfa: Option<BayerOrder>) -> Result<Option<TiledMosaic>> {
        match self {
            MosaicSource::Auto => Ok(cfa.map(|order| TiledMosaic::from_default(order.default_mosaic()))),
            MosaicSource::Default(default) => Ok(Some(TiledMosaic::from_default(*default))),
            MosaicSource::Text(text) => TiledMosaic::parse_text(text).map(Some),
            MosaicSource::File(path) => TiledMosaic::from_file(path).map(Some),
        }
    }
}

/// Configuration for RAW to cube transcoding
#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    /// Cube memory layout
    pub layout: Layout,
    pub mosaic: MosaicSource,
    /// Image format of exported bands
    pub band_format: BandImageFormat,
    /// Compression method for TIFF bands
    pub compression: TiffCompression,
    /// Predictor value for compression (typically 2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions before transcoding
    pub validate_dimensions: bool,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Multiplane,
            mosaic: MosaicSource::Auto,
            band_format: BandImageFormat::Pgm,
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
        }
    }
}

impl TranscodeConfig {
    pub fn builder() -> TranscodeConfigBuilder {
        TranscodeConfigBuilder::default()
    }
}

/// Builder for TranscodeConfig
#[derive(Default)]
pub struct TranscodeConfigBuilder {
    layout: Option<Layout>,
    mosaic: Option<MosaicSource>,
    band_format: Option<BandImageFormat>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
}

impl TranscodeConfigBuilder {
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn mosaic(mut self, mosaic: MosaicSource) -> Self {
        self.mosaic = Some(mosaic);
        self
    }

    pub fn band_format(mut self, format: BandImageFormat) -> Self {
        self.band_format = Some(format);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn build(self) -> TranscodeConfig {
        let default = TranscodeConfig::default();
        TranscodeConfig {
            layout: self.layout.unwrap_or(default.layout),
            mosaic: self.mosaic.unwrap_or(default.mosaic),
            band_format: self.band_format.unwrap_or(default.band_format),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
        }
    }
}
