//! Cube transforms
//!
//! Encode (mosaic raster to cube), decode (one wavelength back to a raster)
//! and reduce (wavelength subset). All three address the cube through
//! [`CubeDescriptor::element_index`](crate::hyperspectral::CubeDescriptor::element_index)
//! and move samples as opaque 1 or 2 byte units, so byte order is preserved.

mod source;
mod encode;
mod decode;
mod reduce;


pub use source::{BayerOrder, PlaneMut, RasterImage, SourceFormat, SourceInfo};
pub use encode::Encoder;
pub use decode::{Decoder, NavigationEvent, resolve_slot};
pub use reduce::{Reducer, Selection};

/// Copies the `width`-byte sample at element `src_index` of `src` to element
/// `dst_index` of `dst`.
#[inline(always)]
pub(crate) fn copy_sample(dst: &mut [u8], dst_index: usize, src: &[u8], src_index: usize, width: usize) {
    let d = dst_index * width;
    let s = src_index * width;
    dst[d..d + width].copy_from_slice(&src[s..s + width]);
}
