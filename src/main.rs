use std::path::PathBuf;

use anyhow::{Context, Result};
use hspec_transcode_rs::hyperspectral::export::{ExportFormat, FileSink};
use hspec_transcode_rs::hyperspectral::{
    BandImageFormat, Layout, MosaicSource, RawLoaderReader, RawToCubePipeline, TranscodeConfig,
};
use hspec_transcode_rs::logger;

use tracing::{error, info};

/// Usage: `hspec_transcode_rs [input.arw] [output_dir] [raw|gerbil|csv|xml] [multiplane|interleaved] [mosaic]`
fn main() -> Result<()> {
    logger::init();

    info!("Starting hspec_transcode_rs...");

    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| "input.arw".to_string()));
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let format: ExportFormat = args
        .next()
        .as_deref()
        .unwrap_or("gerbil")
        .parse()
        .context("invalid export format")?;
    let layout: Layout = args
        .next()
        .as_deref()
        .unwrap_or("multiplane")
        .parse()
        .context("invalid cube layout")?;
    let mosaic = args.next().map_or(MosaicSource::Auto, MosaicSource::Text);

    let config = TranscodeConfig::builder()
        .layout(layout)
        .mosaic(mosaic)
        .band_format(BandImageFormat::Pgm)
        .build();

    let sink = format
        .open(&output_dir, format.default_base_name(), config.band_format)
        .with_context(|| format!("cannot open {} output in {}", format, output_dir.display()))?;
    let sink = FileSink::new(sink, format.default_base_name());
    let mut pipeline = RawToCubePipeline::with_custom(RawLoaderReader, sink, config);

    info!("RAW to cube pipeline initialized");
    info!("Layout: {}", pipeline.config().layout);
    info!("Mosaic: {:?}", pipeline.config().mosaic);
    info!("Export format: {}", format);

    match pipeline.convert_file(&input) {
        Ok(descriptor) => info!(
            "Transcoding successful: {}x{} with {} wavelengths",
            descriptor.width(),
            descriptor.height(),
            descriptor.wavelength_count()
        ),
        Err(e) => error!("Transcoding failed: {}", e),
    }

    pipeline.finish().context("failed to flush output")?;
    Ok(())
}
