//! TIFF band encoding and transcoding configuration
//!
//! This module provides the TIFF encoder used for per-band image export and the
//! configuration shared by the transcoding pipeline.

mod writer;
mod standard_tiff_writer;
pub mod types;

pub use writer::TiffWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{MosaicSource, TiffCompression, TranscodeConfig, TranscodeConfigBuilder};
