use std::fs;
use std::sync::{Arc, Mutex};

use tempfile::tempdir;

use super::*;
use crate::hyperspectral::common::error::HyperspectralError;
use crate::hyperspectral::cube::{CubeDescriptor, CubeFrame, Layout, SampleFormat};
use crate::hyperspectral::mosaic::Mosaic;

/// 2x1 cube with wavelengths [20, 10]; sample value = 100 * slot + pixel + 1.
fn cube(format: SampleFormat, layout: Layout) -> (CubeDescriptor, Vec<u8>) {
    let descriptor = CubeDescriptor::new(2, 1, 2, format, layout, Mosaic::new(vec![20, 10])).unwrap();
    let mut data = vec![0u8; descriptor.total_byte_size()];
    let width = descriptor.sample_byte_width();
    for slot in 0..2 {
        for pixel in 0..2 {
            let value = (100 * slot + pixel + 1) as u16;
            let bytes = match format {
                SampleFormat::Gray8 => vec![value as u8],
                SampleFormat::Gray16Le => value.to_le_bytes().to_vec(),
                SampleFormat::Gray16Be => value.to_be_bytes().to_vec(),
            };
            let offset = descriptor.element_index(slot, pixel) * width;
            data[offset..offset + width].copy_from_slice(&bytes);
        }
    }
    (descriptor, data)
}

struct MockSink {
    names: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl CubeSink for MockSink {
    fn write_frame(&mut self, _frame: &CubeFrame<'_, &[u8]>, name: &str) -> crate::hyperspectral::Result<()> {
        self.names.lock().unwrap().push(name.to_string());
        if self.fail {
            return Err(HyperspectralError::OutputWriteError("mock failure".to_string()));
        }
        Ok(())
    }
}

#[test]
fn test_raw_dump_header_and_markers() {
    let (descriptor, data) = cube(SampleFormat::Gray8, Layout::Multiplane);
    let frame = CubeFrame::bind(&descriptor, data.as_slice()).unwrap();

    let mut writer = RawDumpWriter::new(Vec::new());
    writer.write_frame(&frame, "ignored").unwrap();
    writer.write_frame(&frame, "ignored").unwrap();
    writer.finish().unwrap();
    assert_eq!(writer.frames_written(), 2);

    let mut expected = b"video/hyperspectral-cube, width=(int)2, height=(int)1, wavelengths=(int)2, \
format=(string)GRAY8, wavelength_ids=(int)< 20, 10 >\n"
        .to_vec();
    for k in 0..2 {
        expected.extend_from_slice(format!("<frame_start_{}>", k).as_bytes());
        expected.extend_from_slice(&data);
        expected.extend_from_slice(format!("<frame_end_{}>\n", k).as_bytes());
    }
    assert_eq!(writer.into_inner(), expected);
}

#[test]
fn test_csv_layout_and_byte_order() {
    for format in [SampleFormat::Gray8, SampleFormat::Gray16Le, SampleFormat::Gray16Be] {
        for layout in [Layout::Multiplane, Layout::Interleaved] {
            let (descriptor, data) = cube(format, layout);
            let frame = CubeFrame::bind(&descriptor, data.as_slice()).unwrap();

            let mut out = Vec::new();
            CsvWriter::encode(&frame, &mut out).unwrap();

            let expected = format!(
                "#HS-CSV image: NumFrames: 2 FrameWidth: 2 FrameHeight: 1 Format: {}\n\
                 1,101,\n2,102,\n\n0,10,\n1,20,\n",
                format
            );
            assert_eq!(String::from_utf8(out).unwrap(), expected, "{:?} {:?}", format, layout);
        }
    }
}

#[test]
fn test_xml_emits_little_endian_payload() {
    let (descriptor, data) = cube(SampleFormat::Gray16Be, Layout::Interleaved);
    let frame = CubeFrame::bind(&descriptor, data.as_slice()).unwrap();

    let mut out = Vec::new();
    XmlWriter::encode(&frame, &mut out).unwrap();

    let mut expected = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><hyperspectral_image>\
<image_width>2</image_width><image_height>1</image_height>\
<spectral_line_map num_spectral_lines=\"2\"><wavelength>10</wavelength><wavelength>20</wavelength>\
</spectral_line_map><frame frame_index=\"0\"><pixel index=\"0\">"
        .to_vec();
    expected.extend_from_slice(&[1, 0, 101, 0]);
    expected.extend_from_slice(b"</pixel><pixel index=\"1\">");
    expected.extend_from_slice(&[2, 0, 102, 0]);
    expected.extend_from_slice(b"</pixel></frame></hyperspectral_image>");

    assert_eq!(out, expected);
}

#[test]
fn test_pgm_bundle() {
    let dir = tempdir().unwrap();
    let (descriptor, data) = cube(SampleFormat::Gray16Le, Layout::Interleaved);
    let frame = CubeFrame::bind(&descriptor, data.as_slice()).unwrap();

    let mut writer = BandBundleWriter::new(dir.path(), BandImageFormat::Pgm);
    writer.write_frame(&frame, "image0").unwrap();

    let manifest = fs::read_to_string(dir.path().join("image0.gerbil")).unwrap();
    assert_eq!(manifest, "2 image0/\n10.pgm 10\n20.pgm 20\n");

    let band = fs::read(dir.path().join("image0").join("10.pgm")).unwrap();
    let mut expected = b"P5 2 1 65535 ".to_vec();
    expected.extend_from_slice(&[0, 101, 0, 102]);
    assert_eq!(band, expected);

    let band = fs::read(dir.path().join("image0").join("20.pgm")).unwrap();
    assert_eq!(&band[band.len() - 4..], &[0, 1, 0, 2]);
}

#[test]
fn test_existing_bundle_is_skipped() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("image0")).unwrap();
    let (descriptor, data) = cube(SampleFormat::Gray8, Layout::Multiplane);
    let frame = CubeFrame::bind(&descriptor, data.as_slice()).unwrap();

    let mut writer = BandBundleWriter::new(dir.path(), BandImageFormat::Pgm);
    writer.write_frame(&frame, "image0").unwrap();

    assert!(!dir.path().join("image0.gerbil").exists());
    assert_eq!(fs::read_dir(dir.path().join("image0")).unwrap().count(), 0);
}

#[test]
fn test_tiff_bundle() {
    let dir = tempdir().unwrap();
    let (descriptor, data) = cube(SampleFormat::Gray8, Layout::Multiplane);
    let frame = CubeFrame::bind(&descriptor, data.as_slice()).unwrap();

    let mut writer = BandBundleWriter::new(dir.path(), BandImageFormat::Tiff);
    writer.write_frame(&frame, "cube").unwrap();

    let manifest = fs::read_to_string(dir.path().join("cube.gerbil")).unwrap();
    assert_eq!(manifest, "2 cube/\n10.tiff 10\n20.tiff 20\n");

    let band = fs::read(dir.path().join("cube").join("20.tiff")).unwrap();
    assert!(band.starts_with(b"II") || band.starts_with(b"MM"));
}

#[test]
fn test_file_sink_names_frames() {
    let (descriptor, data) = cube(SampleFormat::Gray8, Layout::Multiplane);
    let frame = CubeFrame::bind(&descriptor, data.as_slice()).unwrap();
    let names = Arc::new(Mutex::new(Vec::new()));

    let mut sink = FileSink::new(MockSink { names: names.clone(), fail: false }, "csv_image");
    assert_eq!(sink.write(&frame).unwrap(), "csv_image0");
    assert_eq!(sink.write(&frame).unwrap(), "csv_image1");

    assert_eq!(*names.lock().unwrap(), vec!["csv_image0", "csv_image1"]);
    assert_eq!(sink.counter(), 2);
}

#[test]
fn test_file_sink_counter_wraps_and_advances_on_failure() {
    let (descriptor, data) = cube(SampleFormat::Gray8, Layout::Multiplane);
    let frame = CubeFrame::bind(&descriptor, data.as_slice()).unwrap();
    let names = Arc::new(Mutex::new(Vec::new()));

    let mut sink = FileSink::new(MockSink { names: names.clone(), fail: true }, "f").with_counter(i64::MAX as u64);
    assert!(sink.write(&frame).is_err());
    assert_eq!(sink.counter(), 0);
    assert_eq!(names.lock().unwrap()[0], format!("f{}", i64::MAX));
}

#[test]
fn test_csv_sink_writes_file() {
    let dir = tempdir().unwrap();
    let (descriptor, data) = cube(SampleFormat::Gray8, Layout::Multiplane);
    let frame = CubeFrame::bind(&descriptor, data.as_slice()).unwrap();

    let mut sink = FileSink::new(
        ExportFormat::Csv.open(dir.path(), "unused", BandImageFormat::Pgm).unwrap(),
        ExportFormat::Csv.default_base_name(),
    );
    sink.write(&frame).unwrap();

    let text = fs::read_to_string(dir.path().join("csv_image0.csv")).unwrap();
    assert!(text.starts_with("#HS-CSV image: NumFrames: 2"));
}

#[test]
fn test_raw_sink_in_missing_directory() {
    let dir = tempdir().unwrap();
    let result = RawDumpWriter::create(dir.path().join("missing").join("dump"));

    assert!(matches!(result, Err(HyperspectralError::OutputWriteError(_))));
}

#[test]
fn test_export_format_tags() {
    assert_eq!("Gerbil".parse::<ExportFormat>().unwrap(), ExportFormat::Gerbil);
    assert_eq!(ExportFormat::Xml.to_string(), "xml");
    assert_eq!("tif".parse::<BandImageFormat>().unwrap(), BandImageFormat::Tiff);
    assert!("png".parse::<ExportFormat>().is_err());
}
