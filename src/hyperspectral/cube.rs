//! Data cube geometry and buffer binding
//!
//! `CubeDescriptor` is the single source of truth for cube dimensions and
//! byte sizes; `CubeFrame`/`CubeFrameMut` bind a descriptor to a buffer for
//! the duration of one operation.

mod format;
mod descriptor;
mod frame;

pub use format::{Layout, SampleFormat};
pub use descriptor::{CubeDeclaration, CubeDescriptor};
pub use frame::{CubeFrame, CubeFrameMut};

/// Media type tag carried in cube declarations and dump headers.
pub const HYPERSPECTRAL_MEDIA_TYPE: &str = "video/hyperspectral-cube";
