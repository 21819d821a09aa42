//! Transcoding between mosaic-tiled hyperspectral sensor rasters and
//! multi-band data cubes.

pub mod hyperspectral;
pub mod logger;
