//! Binding of a cube descriptor to a backing buffer.
//!
//! The buffer type is generic: bind a `&[u8]`/`&mut [u8]` to borrow for the
//! scope of one operation, or a clone of an `Arc<[u8]>` (or any other owning
//! handle) to hold a shared claim that is released when the frame drops.
//! A rejected bind drops the handle before returning.

use tracing::error;

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::cube::descriptor::CubeDescriptor;
use crate::hyperspectral::cube::format::Layout;

fn check_size(descriptor: &CubeDescriptor, actual: usize) -> Result<()> {
    let required = descriptor.total_byte_size();
    if actual < required {
        error!("Invalid buffer size {} < {}", actual, required);
        return Err(HyperspectralError::InvalidSize { actual, required });
    }
    Ok(())
}

fn plane_range(descriptor: &CubeDescriptor, slot: usize) -> Option<std::ops::Range<usize>> {
    if descriptor.layout() != Layout::Multiplane || slot >= descriptor.wavelength_count() {
        return None;
    }
    let start = descriptor.plane_offset(slot);
    Some(start..start + descriptor.wavelength_byte_size())
}

/// Read access to a cube stored in `B`.
#[derive(Debug)]
pub struct CubeFrame<'a, B: AsRef<[u8]>> {
    descriptor: &'a CubeDescriptor,
    buffer: B,
}

impl<'a, B: AsRef<[u8]>> CubeFrame<'a, B> {
    pub fn bind(descriptor: &'a CubeDescriptor, buffer: B) -> Result<Self> {
        check_size(descriptor, buffer.as_ref().len())?;
        Ok(Self { descriptor, buffer })
    }

    pub fn descriptor(&self) -> &'a CubeDescriptor {
        self.descriptor
    }

    /// Cube bytes, trimmed to the descriptor's total size.
    pub fn data(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.descriptor.total_byte_size()]
    }

    /// Plane for `slot` of a multiplane cube.
    pub fn plane(&self, slot: usize) -> Option<&[u8]> {
        plane_range(self.descriptor, slot).map(|range| &self.buffer.as_ref()[range])
    }

    /// Raw bytes of the sample at `(slot, pixel)`.
    pub fn sample(&self, slot: usize, pixel: usize) -> &[u8] {
        let width = self.descriptor.sample_byte_width();
        let offset = self.descriptor.element_index(slot, pixel) * width;
        &self.buffer.as_ref()[offset..offset + width]
    }

    /// Ends the binding and hands the buffer back.
    pub fn unbind(self) -> B {
        self.buffer
    }
}

/// Write access to a cube stored in `B`.
#[derive(Debug)]
pub struct CubeFrameMut<'a, B: AsRef<[u8]> + AsMut<[u8]>> {
    descriptor: &'a CubeDescriptor,
    buffer: B,
}

impl<'a, B: AsRef<[u8]> + AsMut<[u8]>> CubeFrameMut<'a, B> {
    pub fn bind(descriptor: &'a CubeDescriptor, buffer: B) -> Result<Self> {
        check_size(descriptor, buffer.as_ref().len())?;
        Ok(Self { descriptor, buffer })
    }

    pub fn descriptor(&self) -> &'a CubeDescriptor {
        self.descriptor
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.descriptor.total_byte_size()]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        let total = self.descriptor.total_byte_size();
        &mut self.buffer.as_mut()[..total]
    }

    pub fn plane_mut(&mut self, slot: usize) -> Option<&mut [u8]> {
        let range = plane_range(self.descriptor, slot)?;
        Some(&mut self.buffer.as_mut()[range])
    }

    /// Read-only view over the same buffer.
    pub fn as_frame(&self) -> CubeFrame<'a, &[u8]> {
        CubeFrame {
            descriptor: self.descriptor,
            buffer: self.data(),
        }
    }

    pub fn unbind(self) -> B {
        self.buffer
    }
}
