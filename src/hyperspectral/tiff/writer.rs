use std::io::Write;

use crate::hyperspectral::common::error::Result;
use crate::hyperspectral::cube::SampleFormat;
use crate::hyperspectral::tiff::types::TranscodeConfig;
use crate::hyperspectral::transform::RasterImage;

pub trait TiffWriter {
    /// Encodes one single-band raster whose samples are stored as `format`.
    fn write_tiff(
        &self,
        band: &RasterImage<'_>,
        format: SampleFormat,
        output: &mut dyn Write,
        config: &TranscodeConfig,
    ) -> Result<()>;
}
