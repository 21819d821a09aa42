//! Spectral mosaic model
//!
//! A mosaic is the repeating tile of wavelength identifiers laid over the
//! sensor. It can come from a built-in default, from the textual
//! `W,H=row:row:...` grammar, or from a declared list of ids.

mod defaults;
mod parser;

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::hyperspectral::common::error::{HyperspectralError, Result};

pub use defaults::DefaultMosaic;
pub use parser::parse_id_list;

/// Semantic wavelength identifier, constrained to `[0, i32::MAX]`.
pub type WavelengthId = u32;

/// Largest accepted wavelength id.
pub const MAX_WAVELENGTH_ID: WavelengthId = i32::MAX as WavelengthId;

/// Ordered wavelength ids, one per cube slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mosaic {
    wavelengths: Vec<WavelengthId>,
}

impl Mosaic {
    pub fn new(wavelengths: Vec<WavelengthId>) -> Self {
        Self { wavelengths }
    }

    /// Builds a mosaic from an externally declared id list.
    ///
    /// The list must hold exactly `expected_size` entries and every entry must
    /// fit the wavelength id range.
    pub fn from_wavelength_list(ids: &[i64], expected_size: usize) -> Result<Self> {
        if ids.len() != expected_size {
            return Err(HyperspectralError::SizeMismatch {
                expected: expected_size,
                actual: ids.len(),
            });
        }

        let wavelengths = ids
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                WavelengthId::try_from(value)
                    .ok()
                    .filter(|&id| id <= MAX_WAVELENGTH_ID)
                    .ok_or(HyperspectralError::TypeMismatch { index, value })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { wavelengths })
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn wavelengths(&self) -> &[WavelengthId] {
        &self.wavelengths
    }

    pub fn get(&self, slot: usize) -> Option<WavelengthId> {
        self.wavelengths.get(slot).copied()
    }

    /// First slot holding `id`, by linear search in slot order.
    pub fn slot_of(&self, id: WavelengthId) -> Option<usize> {
        self.wavelengths.iter().position(|&w| w == id)
    }

    pub fn contains(&self, id: WavelengthId) -> bool {
        self.wavelengths.contains(&id)
    }

    /// Ids in ascending order, as the export manifests list them.
    pub fn sorted(&self) -> Vec<WavelengthId> {
        let mut sorted = self.wavelengths.clone();
        sorted.sort_unstable();
        sorted
    }
}

/// A mosaic together with the tile it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiledMosaic {
    tile_width: usize,
    tile_height: usize,
    mosaic: Mosaic,
}

impl TiledMosaic {
    pub fn new(tile_width: usize, tile_height: usize, wavelengths: Vec<WavelengthId>) -> Result<Self> {
        if tile_width == 0 || tile_height == 0 {
            return Err(HyperspectralError::GeometryMismatch(format!(
                "mosaic tile must not be empty, got {}x{}",
                tile_width, tile_height
            )));
        }
        if wavelengths.len() != tile_width * tile_height {
            return Err(HyperspectralError::SizeMismatch {
                expected: tile_width * tile_height,
                actual: wavelengths.len(),
            });
        }

        Ok(Self {
            tile_width,
            tile_height,
            mosaic: Mosaic::new(wavelengths),
        })
    }

    /// Looks up a built-in pattern by its numeric default id.
    pub fn from_default_id(id: i32) -> Result<Self> {
        let default = DefaultMosaic::from_id(id)?;
        Ok(Self::from_default(default))
    }

    pub fn from_default(default: DefaultMosaic) -> Self {
        debug!(?default, "Selected default mosaic");
        let (tile_width, tile_height) = default.tile_size();
        Self {
            tile_width,
            tile_height,
            mosaic: Mosaic::new(default.wavelengths().to_vec()),
        }
    }

    /// Parses the `W,H=v,v,...:v,v,...` grammar.
    pub fn parse_text(spec: &str) -> Result<Self> {
        parser::parse_mosaic(spec)
    }

    /// Reads the textual grammar from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading mosaic file");

        let text = std::fs::read_to_string(path).map_err(|e| {
            HyperspectralError::parse(path.display().to_string(), format!("cannot read mosaic file: {}", e))
        })?;

        parser::parse_mosaic(&text)
    }

    pub fn tile_width(&self) -> usize {
        self.tile_width
    }

    pub fn tile_height(&self) -> usize {
        self.tile_height
    }

    pub fn mosaic(&self) -> &Mosaic {
        &self.mosaic
    }

    pub fn into_mosaic(self) -> Mosaic {
        self.mosaic
    }

    /// Slot index for the tile-local coordinate `(x, y)`.
    pub fn slot_at(&self, x: usize, y: usize) -> usize {
        (x % self.tile_width) + (y % self.tile_height) * self.tile_width
    }
}

impl FromStr for TiledMosaic {
    type Err = HyperspectralError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_text(s)
    }
}

impl fmt::Display for TiledMosaic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}=", self.tile_width, self.tile_height)?;
        for (row_index, row) in self.mosaic.wavelengths().chunks(self.tile_width).enumerate() {
            if row_index > 0 {
                f.write_str(":")?;
            }
            for (col, id) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", id)?;
            }
        }
        Ok(())
    }
}
