use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::hyperspectral::common::error::Result;
use crate::hyperspectral::cube::CubeFrame;
use crate::hyperspectral::export::create_file;
use crate::hyperspectral::export::sink::CubeSink;

/// Writes each frame as `<name>.csv`: one line per pixel holding its values
/// in slot order, a blank line after each scan row and a trailer mapping
/// `index,wavelength_id`.
pub struct CsvWriter {
    directory: PathBuf,
}

impl CsvWriter {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Writes the CSV form of `frame`. 16-bit samples are decoded with the
    /// cube's declared byte order.
    pub fn encode(frame: &CubeFrame<'_, &[u8]>, output: &mut dyn Write) -> Result<()> {
        let cube = frame.descriptor();
        let format = cube.sample_format();

        writeln!(
            output,
            "#HS-CSV image: NumFrames: {} FrameWidth: {} FrameHeight: {} Format: {}",
            cube.wavelength_count(),
            cube.width(),
            cube.height(),
            format
        )?;

        for y in 0..cube.height() {
            for x in 0..cube.width() {
                let pixel = x + y * cube.width();
                for slot in 0..cube.wavelength_count() {
                    write!(output, "{},", format.read_sample(frame.sample(slot, pixel)))?;
                }
                writeln!(output)?;
            }
            writeln!(output)?;
        }

        for (index, id) in cube.mosaic().sorted().iter().enumerate() {
            writeln!(output, "{},{},", index, id)?;
        }
        Ok(())
    }
}

impl CubeSink for CsvWriter {
    fn write_frame(&mut self, frame: &CubeFrame<'_, &[u8]>, name: &str) -> Result<()> {
        let path = self.directory.join(format!("{}.csv", name));
        let mut file = create_file(&path)?;
        Self::encode(frame, &mut file)?;
        file.flush()?;
        info!(path = %path.display(), "Image created");
        Ok(())
    }
}
