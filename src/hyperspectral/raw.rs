//! RAW image reading module
//!
//! This module decodes camera RAW files into a single-channel sensor raster
//! that the encoder can tile by a mosaic.

mod reader;
mod rawloader_reader;
pub mod types;

pub use reader::RawImageReader;
pub use rawloader_reader::RawLoaderReader;
pub use types::RawImageData;
