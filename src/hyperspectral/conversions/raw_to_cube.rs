use std::path::Path;

use tracing::{info, instrument};

use crate::hyperspectral::{
    common::error::{HyperspectralError, Result},
    cube::{CubeDescriptor, CubeFrame},
    export::{BandBundleWriter, CubeSink},
    raw::{RawImageData, RawImageReader, RawLoaderReader},
    tiff::TranscodeConfig,
    transform::Encoder,
};

pub struct RawToCubePipeline<R: RawImageReader, W: CubeSink> {
    reader: R,
    sink: W,
    config: TranscodeConfig,
}

impl RawToCubePipeline<RawLoaderReader, BandBundleWriter> {
    /// Pipeline writing band bundles into `output_dir`.
    pub fn new<P: AsRef<Path>>(config: TranscodeConfig, output_dir: P) -> Self {
        let sink = BandBundleWriter::new(output_dir, config.band_format).with_tiff_config(config.clone());
        Self {
            reader: RawLoaderReader,
            sink,
            config,
        }
    }
}

impl<R: RawImageReader, W: CubeSink> RawToCubePipeline<R, W> {
    pub fn with_custom(reader: R, sink: W, config: TranscodeConfig) -> Self {
        Self { reader, sink, config }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(HyperspectralError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Encodes the sensor raster into a cube, choosing the mosaic from the
    /// configuration and the detected CFA.
    fn encode(&self, raw_image: &RawImageData) -> Result<(CubeDescriptor, Vec<u8>)> {
        let mut encoder = Encoder::with_layout(self.config.layout);
        if let Some(mosaic) = self.config.mosaic.resolve(raw_image.cfa)? {
            encoder.set_mosaic(mosaic);
        }

        let descriptor = encoder.set_format(raw_image.source_info())?.clone();
        let bytes = raw_image.to_le_bytes();
        let cube = encoder.encode_to_vec(&raw_image.raster(&bytes))?;
        Ok((descriptor, cube))
    }

    /// Decodes `input_data`, encodes the cube and writes it to the sink as
    /// frame `name`.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn convert(&mut self, input_data: &[u8], name: &str) -> Result<CubeDescriptor> {
        info!("Starting RAW to cube transcoding");

        let raw_image = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(input_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = raw_image.width,
                height = raw_image.height
            ).entered();
            self.validate_dimensions(raw_image.width, raw_image.height)?;
        }

        let (descriptor, cube) = {
            let _span = tracing::info_span!("encode_cube", layout = %self.config.layout).entered();
            self.encode(&raw_image)?
        };

        {
            let _span = tracing::info_span!("write_cube").entered();
            let frame = CubeFrame::bind(&descriptor, cube.as_slice())?;
            self.sink.write_frame(&frame, name)?;
        }

        info!(
            width = descriptor.width(),
            height = descriptor.height(),
            wavelengths = descriptor.wavelength_count(),
            "Transcoding complete"
        );
        Ok(descriptor)
    }

    /// Transcodes a RAW file; the frame is named after the file stem.
    #[instrument(skip(self, input_path))]
    pub fn convert_file<P: AsRef<Path>>(&mut self, input_path: P) -> Result<CubeDescriptor> {
        let input_path = input_path.as_ref();
        let name = input_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| HyperspectralError::InputReadError(format!("{}: no file name", input_path.display())))?;

        info!(input = %input_path.display(), name = %name, "Converting file");

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                HyperspectralError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        self.convert(&input_data, &name)
    }

    /// Flushes the sink.
    pub fn finish(&mut self) -> Result<()> {
        self.sink.finish()
    }

    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TranscodeConfig) {
        self.config = config;
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }
}
