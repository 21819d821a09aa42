//! Single-wavelength extraction with an interactive band cursor.

use tracing::{debug, info, instrument, warn};

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::{CubeDeclaration, CubeDescriptor, CubeFrame, SampleFormat};
use crate::hyperspectral::mosaic::{Mosaic, WavelengthId};
use crate::hyperspectral::transform::copy_sample;
use crate::hyperspectral::transform::source::PlaneMut;

/// Input event that may move the band cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    MouseButton(u8),
    Key(String),
}

/// Finds the slot holding `id`.
///
/// A missing id yields [`HyperspectralError::WavelengthNotFound`] naming the
/// slot 0 id that callers fall back to.
pub fn resolve_slot(mosaic: &Mosaic, id: WavelengthId) -> Result<usize> {
    mosaic
        .slot_of(id)
        .ok_or(HyperspectralError::WavelengthNotFound {
            requested: id,
            fallback: mosaic.get(0).unwrap_or_default(),
        })
}

/// Decoder state: requested wavelength, bound cube and the current slot.
#[derive(Debug, Default)]
pub struct Decoder {
    wavelength_id: WavelengthId,
    descriptor: Option<CubeDescriptor>,
    current_slot: usize,
    fallback: Option<HyperspectralError>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder showing `id` once a cube is bound. 0 selects the first slot.
    pub fn with_wavelength_id(id: WavelengthId) -> Self {
        Self {
            wavelength_id: id,
            ..Self::default()
        }
    }

    pub fn wavelength_id(&self) -> WavelengthId {
        self.wavelength_id
    }

    /// Selects the band to show. Takes effect immediately if a cube is bound.
    pub fn set_wavelength_id(&mut self, id: WavelengthId) {
        self.wavelength_id = id;
        if self.descriptor.is_some() {
            self.resolve();
        }
    }

    /// Binds the input cube geometry and resolves the requested band.
    pub fn set_format(&mut self, descriptor: CubeDescriptor) {
        debug!(
            width = descriptor.width(),
            height = descriptor.height(),
            wavelengths = descriptor.wavelength_count(),
            layout = %descriptor.layout(),
            "Decoder geometry bound"
        );
        self.descriptor = Some(descriptor);
        self.resolve();
    }

    /// Derives the cube from its declaration, then binds it. A rejected
    /// declaration leaves the previous binding in place.
    pub fn set_declaration(&mut self, declaration: &CubeDeclaration) -> Result<()> {
        let descriptor = declaration.derive()?;
        self.set_format(descriptor);
        Ok(())
    }

    fn resolve(&mut self) {
        let Some(descriptor) = &self.descriptor else {
            return;
        };
        match resolve_slot(descriptor.mosaic(), self.wavelength_id) {
            Ok(slot) => {
                self.current_slot = slot;
                self.fallback = None;
            }
            Err(err) => {
                if self.wavelength_id != 0 {
                    warn!("{}", err);
                    self.fallback = Some(err);
                } else {
                    self.fallback = None;
                }
                self.current_slot = 0;
            }
        }
    }

    /// Warning left by the last band resolution, if the requested id was missing.
    pub fn fallback_warning(&self) -> Option<&HyperspectralError> {
        self.fallback.as_ref()
    }

    pub fn descriptor(&self) -> Option<&CubeDescriptor> {
        self.descriptor.as_ref()
    }

    /// Geometry of the extracted raster: cube width, height and sample format.
    pub fn output_format(&self) -> Option<(usize, usize, SampleFormat)> {
        self.descriptor
            .as_ref()
            .map(|d| (d.width(), d.height(), d.sample_format()))
    }

    pub fn current_slot(&self) -> usize {
        self.current_slot
    }

    /// Wavelength id at the cursor.
    pub fn current_wavelength(&self) -> Option<WavelengthId> {
        self.descriptor
            .as_ref()
            .and_then(|d| d.mosaic().get(self.current_slot))
    }

    fn count(&self) -> usize {
        self.descriptor.as_ref().map_or(0, |d| d.wavelength_count())
    }

    pub fn advance(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        self.current_slot = (self.current_slot + 1) % count;
        info!(slot = self.current_slot, wavelength = ?self.current_wavelength(), "Showing next wavelength");
    }

    pub fn retreat(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        self.current_slot = (self.current_slot + count - 1) % count;
        info!(slot = self.current_slot, wavelength = ?self.current_wavelength(), "Showing previous wavelength");
    }

    /// Applies a navigation event. Returns whether the event moved the cursor.
    pub fn handle_navigation(&mut self, event: &NavigationEvent) -> bool {
        match event {
            NavigationEvent::MouseButton(1) => self.retreat(),
            NavigationEvent::MouseButton(3) => self.advance(),
            NavigationEvent::Key(key) if key == "Left" => self.retreat(),
            NavigationEvent::Key(key) if key == "Right" => self.advance(),
            _ => return false,
        }
        true
    }

    /// Copies the band at the cursor into `output`.
    #[instrument(skip(self, frame, output), fields(input_size = frame.data().len(), slot = self.current_slot))]
    pub fn extract<B: AsRef<[u8]>>(&self, frame: &CubeFrame<'_, B>, output: &mut PlaneMut<'_>) -> Result<()> {
        let cube = self.descriptor.as_ref().ok_or(HyperspectralError::GeometryNotComputed)?;
        if frame.descriptor() != cube {
            return Err(HyperspectralError::GeometryMismatch(
                "input frame is bound to a different cube".to_string(),
            ));
        }
        if cube.wavelength_count() == 0 {
            return Err(HyperspectralError::GeometryMismatch(
                "cube has no wavelengths".to_string(),
            ));
        }
        if output.width != cube.width() || output.height != cube.height() {
            return Err(HyperspectralError::GeometryMismatch(format!(
                "output raster is {}x{}, cube is {}x{}",
                output.width,
                output.height,
                cube.width(),
                cube.height()
            )));
        }

        let byte_width = cube.sample_byte_width();
        output.validate(byte_width)?;

        let input = frame.data();
        for y in 0..cube.height() {
            for x in 0..cube.width() {
                let pixel = x + y * cube.width();
                copy_sample(
                    output.data,
                    x + y * output.stride,
                    input,
                    cube.element_index(self.current_slot, pixel),
                    byte_width,
                );
            }
        }

        Ok(())
    }

    /// Extracts into a tightly packed raster.
    pub fn extract_to_vec<B: AsRef<[u8]>>(&self, frame: &CubeFrame<'_, B>) -> Result<Vec<u8>> {
        let cube = self.descriptor.as_ref().ok_or(HyperspectralError::GeometryNotComputed)?;
        let mut data = vec![0u8; cube.wavelength_byte_size()];
        let mut plane = PlaneMut::new(&mut data, cube.width(), cube.height());
        self.extract(frame, &mut plane)?;
        Ok(data)
    }
}
