//! Cube export
//!
//! Write-only consumers of a bound cube frame: a raw byte dump, CSV and XML
//! text dumps, and a per-band image bundle with a manifest. [`FileSink`]
//! names successive frames and hands them to any [`CubeSink`].

mod sink;
mod raw_dump;
mod csv;
mod xml;
mod band_bundle;

#[cfg(test)]
mod tests;

pub use sink::{CubeSink, ExportFormat, FileSink};
pub use raw_dump::RawDumpWriter;
pub use csv::CsvWriter;
pub use xml::XmlWriter;
pub use band_bundle::{BandBundleWriter, BandImageFormat};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::{debug, error};

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::CubeFrame;

pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>> {
    debug!("Opening file: {}", path.display());
    File::create(path).map(BufWriter::new).map_err(|e| {
        error!("An error occurred while trying to create file {}", path.display());
        HyperspectralError::OutputWriteError(format!("{}: {}", path.display(), e))
    })
}

/// Samples of one slot in raster order, raw bytes.
pub(crate) fn band_bytes(frame: &CubeFrame<'_, &[u8]>, slot: usize) -> Vec<u8> {
    if let Some(plane) = frame.plane(slot) {
        return plane.to_vec();
    }
    let pixels = frame.descriptor().elements_per_wavelength();
    (0..pixels).flat_map(|pixel| frame.sample(slot, pixel)).copied().collect()
}
