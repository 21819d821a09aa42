use std::sync::{Arc, Mutex};

use tempfile::tempdir;

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::conversions::RawToCubePipeline;
use crate::hyperspectral::cube::{CubeDescriptor, CubeFrame, Layout};
use crate::hyperspectral::export::{BandImageFormat, CubeSink, FileSink};
use crate::hyperspectral::raw::{RawImageData, RawImageReader};
use crate::hyperspectral::tiff::{MosaicSource, TranscodeConfig};
use crate::hyperspectral::transform::BayerOrder;

type Written = Arc<Mutex<Vec<(String, CubeDescriptor, Vec<u8>)>>>;

struct MockReader {
    should_fail: bool,
    mock_data: Option<RawImageData>,
}

impl RawImageReader for MockReader {
    fn read_raw(&self, _data: &[u8]) -> Result<RawImageData> {
        if self.should_fail {
            return Err(HyperspectralError::DecodeError("Mock decode error".to_string()));
        }
        Ok(self.mock_data.clone().unwrap_or(RawImageData {
            width: 4,
            height: 4,
            data: (0..16).collect(),
            bits_per_sample: 16,
            cfa: Some(BayerOrder::Rggb),
        }))
    }
}

struct MockSink {
    should_fail: bool,
    written: Written,
}

impl CubeSink for MockSink {
    fn write_frame(&mut self, frame: &CubeFrame<'_, &[u8]>, name: &str) -> Result<()> {
        if self.should_fail {
            return Err(HyperspectralError::OutputWriteError("Mock write error".to_string()));
        }
        self.written
            .lock()
            .unwrap()
            .push((name.to_string(), frame.descriptor().clone(), frame.data().to_vec()));
        Ok(())
    }
}

fn pipeline(
    mock_data: Option<RawImageData>,
    config: TranscodeConfig,
) -> (RawToCubePipeline<MockReader, MockSink>, Written) {
    let written: Written = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader { should_fail: false, mock_data };
    let sink = MockSink { should_fail: false, written: written.clone() };
    (RawToCubePipeline::with_custom(reader, sink, config), written)
}

#[test]
fn test_successful_conversion_uses_cfa_default() {
    let (mut pipeline, written) = pipeline(None, TranscodeConfig::default());

    let descriptor = pipeline.convert(b"fake raw data", "frame").unwrap();

    assert_eq!((descriptor.width(), descriptor.height()), (2, 2));
    assert_eq!(descriptor.mosaic().wavelengths(), &[630, 531, 530, 440]);

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    let (name, cube, data) = &written[0];
    assert_eq!(name, "frame");
    assert_eq!(cube, &descriptor);
    // first plane holds the top-left sample of every tile: 0, 2, 8, 10
    assert_eq!(&data[..8], &[0, 0, 2, 0, 8, 0, 10, 0]);
}

#[test]
fn test_configured_mosaic_overrides_cfa() {
    let config = TranscodeConfig::builder()
        .layout(Layout::Interleaved)
        .mosaic(MosaicSource::Text("4,1=1,2,3,4".to_string()))
        .build();
    let (mut pipeline, written) = pipeline(None, config);

    let descriptor = pipeline.convert(b"fake raw data", "frame").unwrap();

    assert_eq!((descriptor.width(), descriptor.height()), (1, 4));
    assert_eq!(descriptor.layout(), Layout::Interleaved);
    let written = written.lock().unwrap();
    // pixel vector of row 1 is its four samples in order
    assert_eq!(&written[0].2[8..16], &[4, 0, 5, 0, 6, 0, 7, 0]);
}

#[test]
fn test_gray_default_without_cfa() {
    let raw = RawImageData {
        width: 5,
        height: 5,
        data: vec![1; 25],
        bits_per_sample: 12,
        cfa: None,
    };
    let (mut pipeline, _) = pipeline(Some(raw), TranscodeConfig::default());

    let descriptor = pipeline.convert(b"fake raw data", "frame").unwrap();
    assert_eq!(descriptor.wavelength_count(), 25);
}

#[test]
fn test_reader_failure() {
    let written: Written = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader { should_fail: true, mock_data: None };
    let sink = MockSink { should_fail: false, written: written.clone() };
    let mut pipeline = RawToCubePipeline::with_custom(reader, sink, TranscodeConfig::default());

    let result = pipeline.convert(b"fake raw data", "frame");

    assert!(matches!(result.unwrap_err(), HyperspectralError::DecodeError(_)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_sink_failure() {
    let written: Written = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader { should_fail: false, mock_data: None };
    let sink = MockSink { should_fail: true, written };
    let mut pipeline = RawToCubePipeline::with_custom(reader, sink, TranscodeConfig::default());

    let result = pipeline.convert(b"fake raw data", "frame");

    assert!(matches!(result.unwrap_err(), HyperspectralError::OutputWriteError(_)));
}

#[test]
fn test_dimension_validation_failure() {
    let raw = RawImageData {
        width: 0,
        height: 4,
        data: Vec::new(),
        bits_per_sample: 16,
        cfa: None,
    };
    let (mut pipeline, written) = pipeline(Some(raw), TranscodeConfig::default());

    let result = pipeline.convert(b"fake raw data", "frame");

    assert!(matches!(result.unwrap_err(), HyperspectralError::InvalidDimensions(0, 4)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_untileable_raster() {
    let raw = RawImageData {
        width: 3,
        height: 4,
        data: vec![0; 12],
        bits_per_sample: 16,
        cfa: Some(BayerOrder::Bggr),
    };
    let (mut pipeline, _) = pipeline(Some(raw), TranscodeConfig::default());

    let result = pipeline.convert(b"fake raw data", "frame");
    assert!(matches!(result.unwrap_err(), HyperspectralError::GeometryMismatch(_)));
}

#[test]
fn test_bad_mosaic_config() {
    let config = TranscodeConfig::builder()
        .mosaic(MosaicSource::Text("2,2=1,2:3".to_string()))
        .build();
    let (mut pipeline, _) = pipeline(None, config);

    let result = pipeline.convert(b"fake raw data", "frame");
    assert!(matches!(result.unwrap_err(), HyperspectralError::ParseError { .. }));
}

#[test]
fn test_convert_file_names_frame_after_stem() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("capture_01.arw");
    std::fs::write(&input, b"fake raw data").unwrap();
    let (mut pipeline, written) = pipeline(None, TranscodeConfig::default());

    pipeline.convert_file(&input).unwrap();

    assert_eq!(written.lock().unwrap()[0].0, "capture_01");
}

#[test]
fn test_convert_missing_file() {
    let dir = tempdir().unwrap();
    let (mut pipeline, _) = pipeline(None, TranscodeConfig::default());

    let result = pipeline.convert_file(dir.path().join("missing.arw"));
    assert!(matches!(result.unwrap_err(), HyperspectralError::InputReadError(_)));
}

#[test]
fn test_set_config() {
    let (mut pipeline, _) = pipeline(None, TranscodeConfig::default());
    assert_eq!(pipeline.config().layout, Layout::Multiplane);

    pipeline.set_config(TranscodeConfig::builder().layout(Layout::Interleaved).build());
    assert_eq!(pipeline.config().layout, Layout::Interleaved);
}

#[test]
fn test_default_pipeline_writes_bundle() {
    let dir = tempdir().unwrap();
    let mut pipeline = RawToCubePipeline::new(TranscodeConfig::default(), dir.path());

    let result = pipeline.convert(b"not a raw file", "frame");

    assert!(matches!(result.unwrap_err(), HyperspectralError::DecodeError(_)));
    assert_eq!(pipeline.config().band_format, BandImageFormat::Pgm);
}

#[test]
fn test_file_sink_numbers_pipeline_frames() {
    let written: Written = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader { should_fail: false, mock_data: None };
    let sink = FileSink::new(MockSink { should_fail: false, written: written.clone() }, "csv_image");
    let mut pipeline = RawToCubePipeline::with_custom(reader, sink, TranscodeConfig::default());

    pipeline.convert(b"fake raw data", "first").unwrap();
    pipeline.convert(b"fake raw data", "second").unwrap();
    pipeline.finish().unwrap();

    let names: Vec<String> = written.lock().unwrap().iter().map(|(name, _, _)| name.clone()).collect();
    assert_eq!(names, vec!["csv_image0", "csv_image1"]);
}
