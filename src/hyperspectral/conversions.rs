//! Pipeline conversions module
//!
//! This module contains orchestration logic from camera RAW files to exported cubes.

mod raw_to_cube;

#[cfg(test)]
mod tests;

pub use raw_to_cube::RawToCubePipeline;
