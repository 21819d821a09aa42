//! Mosaic raster to cube.

use std::path::{Path, PathBuf};

use tracing::{debug, error, instrument};

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::{CubeDescriptor, CubeFrameMut, Layout};
use crate::hyperspectral::mosaic::TiledMosaic;
use crate::hyperspectral::transform::copy_sample;
use crate::hyperspectral::transform::source::{RasterImage, SourceInfo};

#[derive(Debug, Clone)]
struct Geometry {
    source: SourceInfo,
    tile: TiledMosaic,
    descriptor: CubeDescriptor,
}

/// Encoder state: the configured mosaic and the geometry of the bound source.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    layout: Layout,
    mosaic: Option<TiledMosaic>,
    mosaic_text: Option<String>,
    mosaic_path: Option<PathBuf>,
    geometry: Option<Geometry>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Changes the output layout. The source geometry must be bound again.
    pub fn set_layout(&mut self, layout: Layout) {
        if self.layout != layout {
            self.layout = layout;
            self.geometry = None;
        }
    }

    /// Mosaic set by the caller, if any. The default for the source format is
    /// used otherwise.
    pub fn mosaic(&self) -> Option<&TiledMosaic> {
        self.mosaic.as_ref()
    }

    pub fn mosaic_text(&self) -> Option<&str> {
        self.mosaic_text.as_deref()
    }

    pub fn mosaic_path(&self) -> Option<&Path> {
        self.mosaic_path.as_deref()
    }

    pub fn set_mosaic(&mut self, mosaic: TiledMosaic) {
        debug!(mosaic = %mosaic, "Encoder mosaic set");
        self.mosaic = Some(mosaic);
        self.mosaic_text = None;
        self.mosaic_path = None;
        self.geometry = None;
    }

    /// Loads the mosaic from its text form. On failure the previous mosaic is kept.
    pub fn set_mosaic_text(&mut self, text: &str) -> Result<()> {
        let mosaic = TiledMosaic::parse_text(text)?;
        self.set_mosaic(mosaic);
        self.mosaic_text = Some(text.to_string());
        Ok(())
    }

    /// Loads the mosaic from a file. On failure the previous mosaic is kept.
    pub fn set_mosaic_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mosaic = TiledMosaic::from_file(path)?;
        self.set_mosaic(mosaic);
        self.mosaic_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Drops the configured mosaic so the source default applies again.
    pub fn clear_mosaic(&mut self) {
        self.mosaic = None;
        self.mosaic_text = None;
        self.mosaic_path = None;
        self.geometry = None;
    }

    /// Binds the source raster geometry and derives the output cube.
    ///
    /// The raster must tile exactly by the mosaic. On failure the previously
    /// bound geometry is kept.
    pub fn set_format(&mut self, source: SourceInfo) -> Result<&CubeDescriptor> {
        let tile = match &self.mosaic {
            Some(mosaic) => mosaic.clone(),
            None => TiledMosaic::from_default(source.format.default_mosaic()),
        };

        let (tile_width, tile_height) = (tile.tile_width(), tile.tile_height());
        if source.width % tile_width != 0 || source.height % tile_height != 0 {
            error!(
                "Source {}x{} does not tile by a {}x{} mosaic",
                source.width, source.height, tile_width, tile_height
            );
            return Err(HyperspectralError::GeometryMismatch(format!(
                "source {}x{} is not a multiple of the {}x{} mosaic tile",
                source.width, source.height, tile_width, tile_height
            )));
        }

        let descriptor = CubeDescriptor::new(
            source.width / tile_width,
            source.height / tile_height,
            tile_width * tile_height,
            source.format.sample_format(),
            self.layout,
            tile.mosaic().clone(),
        )?;

        debug!(
            source_format = %source.format,
            cube_width = descriptor.width(),
            cube_height = descriptor.height(),
            wavelengths = descriptor.wavelength_count(),
            layout = %self.layout,
            "Encoder geometry computed"
        );

        let geometry = self.geometry.insert(Geometry {
            source,
            tile,
            descriptor,
        });
        Ok(&geometry.descriptor)
    }

    pub fn source(&self) -> Option<&SourceInfo> {
        self.geometry.as_ref().map(|g| &g.source)
    }

    /// Output cube of the bound source.
    pub fn descriptor(&self) -> Option<&CubeDescriptor> {
        self.geometry.as_ref().map(|g| &g.descriptor)
    }

    /// Rearranges `raster` into `output`.
    #[instrument(skip(self, raster, output), fields(input_size = raster.data.len()))]
    pub fn encode<B>(&self, raster: &RasterImage<'_>, output: &mut CubeFrameMut<'_, B>) -> Result<()>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let geometry = self.geometry.as_ref().ok_or(HyperspectralError::GeometryNotComputed)?;
        let cube = &geometry.descriptor;

        if output.descriptor() != cube {
            return Err(HyperspectralError::GeometryMismatch(
                "output frame is bound to a different cube".to_string(),
            ));
        }
        if raster.width != geometry.source.width || raster.height != geometry.source.height {
            return Err(HyperspectralError::GeometryMismatch(format!(
                "raster is {}x{}, source was declared {}x{}",
                raster.width, raster.height, geometry.source.width, geometry.source.height
            )));
        }

        let byte_width = cube.sample_byte_width();
        raster.validate(byte_width)?;

        let tile = &geometry.tile;
        let (tile_width, tile_height) = (tile.tile_width(), tile.tile_height());
        let out = output.data_mut();

        for j in 0..raster.height {
            let cube_row = (j / tile_height) * cube.width();
            for i in 0..raster.width {
                let slot = tile.slot_at(i, j);
                let pixel = i / tile_width + cube_row;
                copy_sample(out, cube.element_index(slot, pixel), raster.data, i + j * raster.stride, byte_width);
            }
        }

        Ok(())
    }

    /// Encodes into a freshly allocated cube buffer.
    pub fn encode_to_vec(&self, raster: &RasterImage<'_>) -> Result<Vec<u8>> {
        let cube = self.descriptor().ok_or(HyperspectralError::GeometryNotComputed)?;
        let mut frame = CubeFrameMut::bind(cube, vec![0u8; cube.total_byte_size()])?;
        self.encode(raster, &mut frame)?;
        Ok(frame.unbind())
    }
}
