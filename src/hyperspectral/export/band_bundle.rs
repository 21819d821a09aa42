use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, error, info, warn};

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::{CubeDescriptor, CubeFrame, SampleFormat};
use crate::hyperspectral::export::sink::CubeSink;
use crate::hyperspectral::export::{band_bytes, create_file};
use crate::hyperspectral::tiff::{StandardTiffWriter, TiffWriter, TranscodeConfig};
use crate::hyperspectral::transform::RasterImage;

/// Image format of the per-band files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandImageFormat {
    /// Binary greymap, 16-bit samples big-endian
    #[default]
    Pgm,
    Tiff,
}

impl BandImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            BandImageFormat::Pgm => "pgm",
            BandImageFormat::Tiff => "tiff",
        }
    }
}

impl FromStr for BandImageFormat {
    type Err = HyperspectralError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pgm" => Ok(BandImageFormat::Pgm),
            "tiff" | "tif" => Ok(BandImageFormat::Tiff),
            _ => Err(HyperspectralError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for BandImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes each frame as a directory `<name>/` holding one image per
/// wavelength, `<id>.<ext>`, next to a manifest `<name>.gerbil`.
pub struct BandBundleWriter<T: TiffWriter = StandardTiffWriter> {
    directory: PathBuf,
    format: BandImageFormat,
    tiff_writer: T,
    tiff_config: TranscodeConfig,
}

impl BandBundleWriter<StandardTiffWriter> {
    pub fn new<P: AsRef<Path>>(directory: P, format: BandImageFormat) -> Self {
        Self::with_tiff_writer(directory, format, StandardTiffWriter)
    }
}

impl<T: TiffWriter> BandBundleWriter<T> {
    pub fn with_tiff_writer<P: AsRef<Path>>(directory: P, format: BandImageFormat, tiff_writer: T) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            format,
            tiff_writer,
            tiff_config: TranscodeConfig::default(),
        }
    }

    /// Compression settings for TIFF bands.
    pub fn with_tiff_config(mut self, config: TranscodeConfig) -> Self {
        self.tiff_config = config;
        self
    }

    /// Manifest text for `name`: the wavelength count and bundle directory,
    /// then one `<file> <id>` line per id in ascending order.
    pub fn manifest(descriptor: &CubeDescriptor, name: &str, format: BandImageFormat) -> String {
        let mut manifest = format!("{} {}/\n", descriptor.wavelength_count(), name);
        for id in descriptor.mosaic().sorted() {
            manifest.push_str(&format!("{}.{} {}\n", id, format.extension(), id));
        }
        manifest
    }

    /// Binary PGM of one band. 16-bit samples are written big-endian.
    pub fn encode_pgm(descriptor: &CubeDescriptor, band: &[u8], output: &mut dyn Write) -> Result<()> {
        let format = descriptor.sample_format();
        write!(
            output,
            "P5 {} {} {} ",
            descriptor.width(),
            descriptor.height(),
            format.max_value()
        )?;

        match format {
            SampleFormat::Gray8 | SampleFormat::Gray16Be => output.write_all(band)?,
            SampleFormat::Gray16Le => {
                let swapped: Vec<u8> = band.chunks_exact(2).flat_map(|s| [s[1], s[0]]).collect();
                output.write_all(&swapped)?;
            }
        }
        Ok(())
    }

    fn write_band(&self, descriptor: &CubeDescriptor, band: &[u8], path: &Path) -> Result<()> {
        let mut file = create_file(path)?;
        match self.format {
            BandImageFormat::Pgm => Self::encode_pgm(descriptor, band, &mut file)?,
            BandImageFormat::Tiff => {
                let raster = RasterImage::new(band, descriptor.width(), descriptor.height());
                self.tiff_writer
                    .write_tiff(&raster, descriptor.sample_format(), &mut file, &self.tiff_config)?;
            }
        }
        file.flush()?;
        Ok(())
    }
}

impl<T: TiffWriter> CubeSink for BandBundleWriter<T> {
    fn write_frame(&mut self, frame: &CubeFrame<'_, &[u8]>, name: &str) -> Result<()> {
        let bundle = self.directory.join(name);
        if bundle.exists() {
            warn!("File {} already exists, passing", bundle.display());
            return Ok(());
        }
        fs::create_dir(&bundle).map_err(|e| {
            error!("An error occurred while trying to create dir {}", bundle.display());
            HyperspectralError::OutputWriteError(format!("{}: {}", bundle.display(), e))
        })?;

        let descriptor = frame.descriptor();
        let manifest_path = self.directory.join(format!("{}.gerbil", name));
        let mut manifest = create_file(&manifest_path)?;
        manifest.write_all(Self::manifest(descriptor, name, self.format).as_bytes())?;
        manifest.flush()?;

        for (slot, id) in descriptor.mosaic().wavelengths().iter().enumerate() {
            let path = bundle.join(format!("{}.{}", id, self.format.extension()));
            debug!("filename: {}", path.display());
            self.write_band(descriptor, &band_bytes(frame, slot), &path)?;
        }

        info!(path = %manifest_path.display(), "Image created");
        Ok(())
    }
}
