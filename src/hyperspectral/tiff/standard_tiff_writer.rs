use std::io::Write;

use tiff::encoder::colortype;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tracing::debug;

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::SampleFormat;
use crate::hyperspectral::tiff::types::{TiffCompression, TranscodeConfig};
use crate::hyperspectral::tiff::writer::TiffWriter;
use crate::hyperspectral::transform::RasterImage;

pub struct StandardTiffWriter;

fn compression(method: TiffCompression) -> Compression {
    match method {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    }
}

/// Packs the rows of `band`, dropping stride padding.
fn packed_rows<'a>(band: &'a RasterImage<'_>, byte_width: usize) -> impl Iterator<Item = &'a [u8]> {
    (0..band.height).map(move |row| {
        let start = row * band.stride * byte_width;
        &band.data[start..start + band.width * byte_width]
    })
}

impl TiffWriter for StandardTiffWriter {
    fn write_tiff(
        &self,
        band: &RasterImage<'_>,
        format: SampleFormat,
        output: &mut dyn Write,
        config: &TranscodeConfig,
    ) -> Result<()> {
        debug!("Encoding TIFF band: {}x{} {}", band.width, band.height, format);

        let (Ok(width), Ok(height)) = (u32::try_from(band.width), u32::try_from(band.height)) else {
            return Err(HyperspectralError::InvalidDimensions(band.width, band.height));
        };

        let byte_width = format.byte_width();
        band.validate(byte_width)?;

        let mut buffer = Vec::new();

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| HyperspectralError::EncodeError(e.to_string()))?
            .with_compression(compression(config.compression));

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        let written = match format {
            SampleFormat::Gray8 => {
                let samples: Vec<u8> = packed_rows(band, 1).flatten().copied().collect();
                encoder.write_image::<colortype::Gray8>(width, height, &samples)
            }
            SampleFormat::Gray16Le | SampleFormat::Gray16Be => {
                let samples: Vec<u16> = packed_rows(band, 2)
                    .flat_map(|row| row.chunks_exact(2))
                    .map(|bytes| format.read_sample(bytes))
                    .collect();
                encoder.write_image::<colortype::Gray16>(width, height, &samples)
            }
        };
        written.map_err(|e| HyperspectralError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
