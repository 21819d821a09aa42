//! RAW image reader implementation using the rawloader library.
//!
//! This module provides support for reading various RAW image formats (ARW, CR2, NEF, DNG, etc.)
//! using the rawloader library, including the sensor's colour filter layout so
//! that a matching Bayer mosaic can be chosen.

use std::io::Cursor;

use rawloader::RawImageData as RawloaderImageData;
use tracing::debug;

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::raw::reader::RawImageReader;
use crate::hyperspectral::raw::types::RawImageData;
use crate::hyperspectral::transform::BayerOrder;

/// RAW image reader that uses the rawloader library for decoding.
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

/// Reads the 2x2 colour layout at the image origin.
fn detect_cfa(cfa: &rawloader::CFA) -> Option<BayerOrder> {
    BayerOrder::from_colors([
        cfa.color_at(0, 0),
        cfa.color_at(0, 1),
        cfa.color_at(1, 0),
        cfa.color_at(1, 1),
    ])
}

impl RawImageReader for RawLoaderReader {
    /// Reads and decodes RAW image data from a byte array.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hspec_transcode_rs::hyperspectral::{RawImageReader, RawLoaderReader};
    ///
    /// let reader = RawLoaderReader;
    /// let raw_bytes = std::fs::read("image.arw").unwrap();
    /// let image_data = reader.read_raw(&raw_bytes).unwrap();
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| HyperspectralError::DecodeError(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;

        debug!("Decoded image: {}x{}, cpp {}", width, height, decoded.cpp);
        if decoded.cpp != 1 {
            return Err(HyperspectralError::DecodeError(format!(
                "expected one sample per pixel, got {}",
                decoded.cpp
            )));
        }

        // Float data is normalised to 0.0-1.0
        let data: Vec<u16> = match decoded.data {
            RawloaderImageData::Integer(values) => values,
            RawloaderImageData::Float(values) => {
                values.iter().map(|&v| (v * u16::MAX as f32) as u16).collect()
            }
        };

        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            U16_BITS - max_white_level.leading_zeros()
        };

        let cfa = detect_cfa(&decoded.cfa);
        debug!(
            "bits_per_sample: {} (max white level: {}), cfa: {:?}",
            bits_per_sample, max_white_level, cfa
        );

        Ok(RawImageData {
            width,
            height,
            data,
            bits_per_sample,
            cfa,
        })
    }
}
