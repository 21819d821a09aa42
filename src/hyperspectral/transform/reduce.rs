//! Wavelength subsetting.
//!
//! The geometry phase ([`Reducer::set_format`]) turns the active selection and
//! the input mosaic into a list of retained slots. The copy phase
//! ([`Reducer::reduce`]) moves whole planes for multiplane cubes and single
//! samples for interleaved ones.

use tracing::{debug, error, instrument, warn};

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::{CubeDescriptor, CubeFrame, CubeFrameMut, Layout};
use crate::hyperspectral::mosaic::{Mosaic, WavelengthId, parse_id_list};
use crate::hyperspectral::transform::copy_sample;

/// Which wavelengths survive a reduction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Include(Vec<WavelengthId>),
    Exclude(Vec<WavelengthId>),
}

impl Selection {
    /// Retained slots of `mosaic`, always in the mosaic's own order.
    pub fn retained_slots(&self, mosaic: &Mosaic) -> Vec<usize> {
        let keep = |id: &WavelengthId| match self {
            Selection::All => true,
            Selection::Include(ids) => ids.contains(id),
            Selection::Exclude(ids) => !ids.contains(id),
        };

        mosaic
            .wavelengths()
            .iter()
            .enumerate()
            .filter(|(_, id)| keep(id))
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Whether a cube with `mosaic` can satisfy this selection. An inclusion
    /// list needs every listed id to be present.
    pub fn accepts(&self, mosaic: &Mosaic) -> bool {
        match self {
            Selection::Include(ids) => ids.iter().all(|id| mosaic.contains(*id)),
            Selection::All | Selection::Exclude(_) => true,
        }
    }
}

fn dedup(ids: Vec<WavelengthId>) -> Vec<WavelengthId> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

#[derive(Debug, Clone)]
struct Geometry {
    input: CubeDescriptor,
    output: CubeDescriptor,
    positions: Vec<usize>,
}

/// Reducer state: the active selection and the geometry of the bound cube.
#[derive(Debug, Clone, Default)]
pub struct Reducer {
    selection: Selection,
    geometry: Option<Geometry>,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(selection: Selection) -> Self {
        Self {
            selection,
            geometry: None,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn replace_selection(&mut self, selection: Selection) {
        match (&self.selection, &selection) {
            (Selection::Exclude(_), Selection::Include(_)) => {
                warn!("Inclusion list replaces the active exclusion list");
            }
            (Selection::Include(_), Selection::Exclude(_)) => {
                warn!("Exclusion list replaces the active inclusion list");
            }
            _ => {}
        }
        debug!(?selection, "Reducer selection changed");
        self.selection = selection;
        self.geometry = None;
    }

    /// Keeps only `ids`. Discards any exclusion list.
    pub fn set_inclusion(&mut self, ids: Vec<WavelengthId>) {
        self.replace_selection(Selection::Include(dedup(ids)));
    }

    /// Drops `ids`. Discards any inclusion list.
    pub fn set_exclusion(&mut self, ids: Vec<WavelengthId>) {
        self.replace_selection(Selection::Exclude(dedup(ids)));
    }

    /// Parses `id,id,...` into an inclusion list. A parse failure keeps the
    /// current selection.
    pub fn set_inclusion_str(&mut self, text: &str) -> Result<()> {
        let ids = parse_id_list(text).inspect_err(|e| error!("Invalid inclusion list: {}", e))?;
        self.set_inclusion(ids);
        Ok(())
    }

    /// Parses `id,id,...` into an exclusion list. A parse failure keeps the
    /// current selection.
    pub fn set_exclusion_str(&mut self, text: &str) -> Result<()> {
        let ids = parse_id_list(text).inspect_err(|e| error!("Invalid exclusion list: {}", e))?;
        self.set_exclusion(ids);
        Ok(())
    }

    /// Back to the identity transform.
    pub fn clear_selection(&mut self) {
        self.replace_selection(Selection::All);
    }

    pub fn accepts(&self, mosaic: &Mosaic) -> bool {
        self.selection.accepts(mosaic)
    }

    /// Computes the retained slots for `input` and the reduced cube.
    ///
    /// Rejects an input lacking an included id, and a selection that would
    /// leave no wavelength. On failure the previous geometry is kept.
    pub fn set_format(&mut self, input: &CubeDescriptor) -> Result<&CubeDescriptor> {
        if let Selection::Include(ids) = &self.selection {
            if let Some(missing) = ids.iter().find(|&&id| !input.mosaic().contains(id)) {
                error!(
                    wavelengths = ?input.mosaic().wavelengths(),
                    "Input cube lacks included wavelength {}", missing
                );
                return Err(HyperspectralError::GeometryMismatch(format!(
                    "input cube has no wavelength {}",
                    missing
                )));
            }
        }

        let positions = self.selection.retained_slots(input.mosaic());
        if positions.is_empty() && input.wavelength_count() > 0 {
            error!("Selection removes every wavelength of the input cube");
            return Err(HyperspectralError::GeometryMismatch(
                "selection leaves no wavelength".to_string(),
            ));
        }

        let ids = positions
            .iter()
            .filter_map(|&slot| input.mosaic().get(slot))
            .collect();
        let output = input.with_mosaic(Mosaic::new(ids))?;

        debug!(
            input_wavelengths = input.wavelength_count(),
            output_wavelengths = output.wavelength_count(),
            ?positions,
            "Reduction geometry computed"
        );

        let geometry = self.geometry.insert(Geometry {
            input: input.clone(),
            output,
            positions,
        });
        Ok(&geometry.output)
    }

    pub fn output_descriptor(&self) -> Option<&CubeDescriptor> {
        self.geometry.as_ref().map(|g| &g.output)
    }

    /// Input slots kept by the reduction, in output order.
    pub fn retained_slots(&self) -> Option<&[usize]> {
        self.geometry.as_ref().map(|g| g.positions.as_slice())
    }

    /// Byte size of one reduced cube.
    pub fn transform_size(&self) -> Result<usize> {
        self.output_descriptor()
            .map(CubeDescriptor::total_byte_size)
            .ok_or(HyperspectralError::GeometryNotComputed)
    }

    fn geometry_for(&self, input: &CubeDescriptor, output: &CubeDescriptor) -> Result<&Geometry> {
        match &self.geometry {
            Some(g) if &g.input == input && &g.output == output => Ok(g),
            _ => {
                error!("Reduction geometry does not match the bound frames");
                Err(HyperspectralError::GeometryNotComputed)
            }
        }
    }

    /// Copies the retained wavelengths of `input` into `output`.
    #[instrument(skip(self, input, output), fields(input_size = input.data().len()))]
    pub fn reduce<I, O>(&self, input: &CubeFrame<'_, I>, output: &mut CubeFrameMut<'_, O>) -> Result<()>
    where
        I: AsRef<[u8]>,
        O: AsRef<[u8]> + AsMut<[u8]>,
    {
        let geometry = self.geometry_for(input.descriptor(), output.descriptor())?;
        let source = &geometry.input;
        let target = &geometry.output;
        let src = input.data();
        let dst = output.data_mut();

        match source.layout() {
            Layout::Multiplane => {
                let plane = source.wavelength_byte_size();
                for (slot, &position) in geometry.positions.iter().enumerate() {
                    let from = source.plane_offset(position);
                    let to = target.plane_offset(slot);
                    dst[to..to + plane].copy_from_slice(&src[from..from + plane]);
                }
            }
            Layout::Interleaved => {
                let byte_width = source.sample_byte_width();
                for (slot, &position) in geometry.positions.iter().enumerate() {
                    for pixel in 0..source.elements_per_wavelength() {
                        copy_sample(
                            dst,
                            target.element_index(slot, pixel),
                            src,
                            source.element_index(position, pixel),
                            byte_width,
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Reduces into a freshly allocated cube buffer.
    pub fn reduce_to_vec<I: AsRef<[u8]>>(&self, input: &CubeFrame<'_, I>) -> Result<Vec<u8>> {
        let target = self.output_descriptor().ok_or(HyperspectralError::GeometryNotComputed)?;
        let mut frame = CubeFrameMut::bind(target, vec![0u8; target.total_byte_size()])?;
        self.reduce(input, &mut frame)?;
        Ok(frame.unbind())
    }
}
