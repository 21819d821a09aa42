use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::hyperspectral::common::error::Result;
use crate::hyperspectral::cube::{CubeDescriptor, CubeFrame, HYPERSPECTRAL_MEDIA_TYPE};
use crate::hyperspectral::export::create_file;
use crate::hyperspectral::export::sink::CubeSink;

/// Streams every frame into one file after a single text header.
pub struct RawDumpWriter<W: Write> {
    output: W,
    path: Option<PathBuf>,
    header_written: bool,
    frames: u64,
}

impl RawDumpWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let output = create_file(path)?;
        Ok(Self {
            output,
            path: Some(path.to_path_buf()),
            header_written: false,
            frames: 0,
        })
    }
}

impl<W: Write> RawDumpWriter<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            path: None,
            header_written: false,
            frames: 0,
        }
    }

    /// Header line describing the cube, without the trailing newline.
    pub fn header(descriptor: &CubeDescriptor) -> String {
        let ids = descriptor
            .mosaic()
            .wavelengths()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{}, width=(int){}, height=(int){}, wavelengths=(int){}, format=(string){}, wavelength_ids=(int)< {} >",
            HYPERSPECTRAL_MEDIA_TYPE,
            descriptor.width(),
            descriptor.height(),
            descriptor.wavelength_count(),
            descriptor.sample_format(),
            ids
        )
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> CubeSink for RawDumpWriter<W> {
    fn write_frame(&mut self, frame: &CubeFrame<'_, &[u8]>, _name: &str) -> Result<()> {
        if !self.header_written {
            writeln!(self.output, "{}", Self::header(frame.descriptor()))?;
            self.header_written = true;
        }

        debug!(frame = self.frames, bytes = frame.data().len(), "Writing raw frame");
        write!(self.output, "<frame_start_{}>", self.frames)?;
        self.output.write_all(frame.data())?;
        writeln!(self.output, "<frame_end_{}>", self.frames)?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.output.flush()?;
        if let Some(path) = &self.path {
            info!(path = %path.display(), frames = self.frames, "Raw dump complete");
        }
        Ok(())
    }
}
