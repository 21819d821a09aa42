use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::hyperspectral::common::error::Result;
use crate::hyperspectral::cube::{CubeFrame, SampleFormat};
use crate::hyperspectral::export::create_file;
use crate::hyperspectral::export::sink::CubeSink;

/// Writes each frame as `<name>.xml`, one `<frame>` per scan row and one
/// `<pixel>` per column whose payload is the raw samples of every slot.
pub struct XmlWriter {
    directory: PathBuf,
}

impl XmlWriter {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Writes the XML form of `frame`. 16-bit payloads are little-endian.
    pub fn encode(frame: &CubeFrame<'_, &[u8]>, output: &mut dyn Write) -> Result<()> {
        let cube = frame.descriptor();

        write!(
            output,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><hyperspectral_image>\
             <image_width>{}</image_width><image_height>{}</image_height>\
             <spectral_line_map num_spectral_lines=\"{}\">",
            cube.width(),
            cube.height(),
            cube.wavelength_count()
        )?;
        for id in cube.mosaic().sorted() {
            write!(output, "<wavelength>{}</wavelength>", id)?;
        }
        write!(output, "</spectral_line_map>")?;

        let swap = cube.sample_format() == SampleFormat::Gray16Be;
        for y in 0..cube.height() {
            write!(output, "<frame frame_index=\"{}\">", y)?;
            for x in 0..cube.width() {
                write!(output, "<pixel index=\"{}\">", x)?;
                let pixel = x + y * cube.width();
                for slot in 0..cube.wavelength_count() {
                    let sample = frame.sample(slot, pixel);
                    if swap {
                        output.write_all(&[sample[1], sample[0]])?;
                    } else {
                        output.write_all(sample)?;
                    }
                }
                write!(output, "</pixel>")?;
            }
            write!(output, "</frame>")?;
        }

        write!(output, "</hyperspectral_image>")?;
        Ok(())
    }
}

impl CubeSink for XmlWriter {
    fn write_frame(&mut self, frame: &CubeFrame<'_, &[u8]>, name: &str) -> Result<()> {
        let path = self.directory.join(format!("{}.xml", name));
        let mut file = create_file(&path)?;
        Self::encode(frame, &mut file)?;
        file.flush()?;
        info!(path = %path.display(), "Image created");
        Ok(())
    }
}
