use tracing::{debug, error};

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::format::{Layout, SampleFormat};
use crate::hyperspectral::mosaic::Mosaic;

/// Cube parameters as declared by the hosting environment.
///
/// Every field is optional so that an absent declaration entry can be told
/// apart from an invalid one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CubeDeclaration {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub wavelengths: Option<usize>,
    pub format: Option<String>,
    pub layout: Option<String>,
    pub wavelength_ids: Option<Vec<i64>>,
}

impl CubeDeclaration {
    /// Derives the cube geometry; see [`CubeDescriptor::derive`].
    pub fn derive(&self) -> Result<CubeDescriptor> {
        CubeDescriptor::derive(self)
    }
}

/// Immutable cube geometry shared by every transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeDescriptor {
    width: usize,
    height: usize,
    wavelength_count: usize,
    sample_format: SampleFormat,
    layout: Layout,
    mosaic: Mosaic,
    elements_per_wavelength: usize,
    total_elements: usize,
    wavelength_byte_size: usize,
    total_byte_size: usize,
}

struct Sizes {
    elements_per_wavelength: usize,
    total_elements: usize,
    wavelength_byte_size: usize,
    total_byte_size: usize,
}

fn sizes(width: usize, height: usize, wavelength_count: usize, byte_width: usize) -> Result<Sizes> {
    let overflow = || {
        error!(
            "Cube {}x{}x{} of {}-byte samples overflows the address space",
            width, height, wavelength_count, byte_width
        );
        HyperspectralError::GeometryMismatch(format!(
            "cube {}x{}x{} of {}-byte samples is too large",
            width, height, wavelength_count, byte_width
        ))
    };

    let elements_per_wavelength = width.checked_mul(height).ok_or_else(overflow)?;
    let total_elements = elements_per_wavelength
        .checked_mul(wavelength_count)
        .ok_or_else(overflow)?;
    let total_byte_size = total_elements.checked_mul(byte_width).ok_or_else(overflow)?;

    Ok(Sizes {
        elements_per_wavelength,
        total_elements,
        wavelength_byte_size: elements_per_wavelength * byte_width,
        total_byte_size,
    })
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or_else(|| {
        error!("No {} given in cube declaration", field);
        HyperspectralError::MissingField(field)
    })
}

impl CubeDescriptor {
    pub fn new(
        width: usize,
        height: usize,
        wavelength_count: usize,
        sample_format: SampleFormat,
        layout: Layout,
        mosaic: Mosaic,
    ) -> Result<Self> {
        if mosaic.len() != wavelength_count {
            error!(
                "Wrong wavelength list size, expected {} got {}",
                wavelength_count,
                mosaic.len()
            );
            return Err(HyperspectralError::SizeMismatch {
                expected: wavelength_count,
                actual: mosaic.len(),
            });
        }

        let sizes = sizes(width, height, wavelength_count, sample_format.byte_width())?;

        Ok(Self {
            width,
            height,
            wavelength_count,
            sample_format,
            layout,
            mosaic,
            elements_per_wavelength: sizes.elements_per_wavelength,
            total_elements: sizes.total_elements,
            wavelength_byte_size: sizes.wavelength_byte_size,
            total_byte_size: sizes.total_byte_size,
        })
    }

    /// Builds the descriptor from a declaration.
    ///
    /// Fails with `MissingField` for any absent entry, `UnsupportedFormat` or
    /// `UnknownLayout` for unrecognised tags, and `SizeMismatch`/`TypeMismatch`
    /// when the wavelength id list disagrees with the declared count.
    pub fn derive(declaration: &CubeDeclaration) -> Result<Self> {
        debug!(?declaration, "Deriving cube descriptor");

        let format: SampleFormat = required(declaration.format.as_deref(), "format")?.parse()?;
        let layout: Layout = required(declaration.layout.as_deref(), "layout")?.parse()?;
        let width = required(declaration.width, "width")?;
        let height = required(declaration.height, "height")?;
        let wavelengths = required(declaration.wavelengths, "wavelengths")?;
        let ids = required(declaration.wavelength_ids.as_deref(), "wavelength_ids")?;

        let mosaic = Mosaic::from_wavelength_list(ids, wavelengths)?;

        Self::new(width, height, wavelengths, format, layout, mosaic)
    }

    /// Declaration that derives back into this descriptor.
    pub fn to_declaration(&self) -> CubeDeclaration {
        CubeDeclaration {
            width: Some(self.width),
            height: Some(self.height),
            wavelengths: Some(self.wavelength_count),
            format: Some(self.sample_format.to_string()),
            layout: Some(self.layout.to_string()),
            wavelength_ids: Some(self.mosaic.wavelengths().iter().map(|&id| i64::from(id)).collect()),
        }
    }

    /// Same spatial geometry, format and layout with a different wavelength set.
    pub fn with_mosaic(&self, mosaic: Mosaic) -> Result<Self> {
        Self::new(self.width, self.height, mosaic.len(), self.sample_format, self.layout, mosaic)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn wavelength_count(&self) -> usize {
        self.wavelength_count
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.sample_format
    }

    pub fn sample_byte_width(&self) -> usize {
        self.sample_format.byte_width()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn mosaic(&self) -> &Mosaic {
        &self.mosaic
    }

    pub fn elements_per_wavelength(&self) -> usize {
        self.elements_per_wavelength
    }

    pub fn total_elements(&self) -> usize {
        self.total_elements
    }

    pub fn wavelength_byte_size(&self) -> usize {
        self.wavelength_byte_size
    }

    pub fn total_byte_size(&self) -> usize {
        self.total_byte_size
    }

    /// Element index of `(slot, pixel)` in the cube buffer.
    ///
    /// `pixel` is the flat raster index `x + y * width`. This is the only
    /// place the layout arithmetic lives; every transform goes through it.
    #[inline]
    pub fn element_index(&self, slot: usize, pixel: usize) -> usize {
        match self.layout {
            Layout::Multiplane => slot * self.elements_per_wavelength + pixel,
            Layout::Interleaved => pixel * self.wavelength_count + slot,
        }
    }

    /// Byte offset of the plane for `slot`; meaningful for multiplane cubes only.
    pub fn plane_offset(&self, slot: usize) -> usize {
        self.wavelength_byte_size * slot
    }
}
