use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, error};

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::CubeFrame;
use crate::hyperspectral::export::band_bundle::{BandBundleWriter, BandImageFormat};
use crate::hyperspectral::export::csv::CsvWriter;
use crate::hyperspectral::export::raw_dump::RawDumpWriter;
use crate::hyperspectral::export::xml::XmlWriter;

/// Consumer of finished cube frames.
pub trait CubeSink {
    /// Writes one frame. `name` is the frame's file stem for per-frame formats.
    fn write_frame(&mut self, frame: &CubeFrame<'_, &[u8]>, name: &str) -> Result<()>;

    /// Flushes anything buffered across frames.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: CubeSink + ?Sized> CubeSink for Box<S> {
    fn write_frame(&mut self, frame: &CubeFrame<'_, &[u8]>, name: &str) -> Result<()> {
        (**self).write_frame(frame, name)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Raw,
    Gerbil,
    Csv,
    Xml,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Raw => "raw",
            ExportFormat::Gerbil => "gerbil",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
        }
    }

    /// File name used when the caller gives none.
    pub fn default_base_name(self) -> &'static str {
        match self {
            ExportFormat::Raw => "raw_hyperspectral_file",
            ExportFormat::Gerbil => "gerbilsink_image",
            ExportFormat::Csv => "csv_image",
            ExportFormat::Xml => "xml_image",
        }
    }

    /// Opens a sink writing into `directory`.
    ///
    /// The raw dump is a single stream file named `base_name`; the other
    /// formats create one file (or bundle) per frame.
    pub fn open(
        self,
        directory: &Path,
        base_name: &str,
        band_format: BandImageFormat,
    ) -> Result<Box<dyn CubeSink>> {
        let sink: Box<dyn CubeSink> = match self {
            ExportFormat::Raw => Box::new(RawDumpWriter::create(directory.join(base_name))?),
            ExportFormat::Gerbil => Box::new(BandBundleWriter::new(directory, band_format)),
            ExportFormat::Csv => Box::new(CsvWriter::new(directory)),
            ExportFormat::Xml => Box::new(XmlWriter::new(directory)),
        };
        Ok(sink)
    }
}

impl FromStr for ExportFormat {
    type Err = HyperspectralError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(ExportFormat::Raw),
            "gerbil" => Ok(ExportFormat::Gerbil),
            "csv" => Ok(ExportFormat::Csv),
            "xml" => Ok(ExportFormat::Xml),
            _ => Err(HyperspectralError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest frame number before the counter wraps to 0.
const MAX_COUNTER: u64 = i64::MAX as u64;

/// Names frames `<base_name><counter>` and passes them to a sink.
pub struct FileSink<S: CubeSink> {
    sink: S,
    base_name: String,
    counter: u64,
}

impl<S: CubeSink> FileSink<S> {
    pub fn new(sink: S, base_name: impl Into<String>) -> Self {
        Self {
            sink,
            base_name: base_name.into(),
            counter: 0,
        }
    }

    /// Starts numbering at `counter`.
    pub fn with_counter(mut self, counter: u64) -> Self {
        self.counter = counter;
        self
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Writes `frame` under the next name and advances the counter, whether
    /// or not the write succeeded.
    pub fn write(&mut self, frame: &CubeFrame<'_, &[u8]>) -> Result<String> {
        let name = format!("{}{}", self.base_name, self.counter);
        debug!(name = %name, "Writing frame");

        let result = self.sink.write_frame(frame, &name);
        self.counter = if self.counter == MAX_COUNTER { 0 } else { self.counter + 1 };

        if let Err(e) = result {
            error!("Write failed for frame {}: {}", name, e);
            return Err(e);
        }
        Ok(name)
    }

    pub fn finish(&mut self) -> Result<()> {
        self.sink.finish()
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

/// Lets a pipeline drive a `FileSink` directly. The pipeline's frame name is
/// replaced by the counter name.
impl<S: CubeSink> CubeSink for FileSink<S> {
    fn write_frame(&mut self, frame: &CubeFrame<'_, &[u8]>, _name: &str) -> Result<()> {
        self.write(frame).map(|_| ())
    }

    fn finish(&mut self) -> Result<()> {
        self.sink.finish()
    }
}
