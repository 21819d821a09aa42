//! Built-in mosaics

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::mosaic::WavelengthId;

const MOSAIC_5X5: [WavelengthId; 25] = [
    739, 753, 727, 713, 688,
    923, 930, 917, 909, 944,
    843, 854, 833, 821, 939,
    883, 893, 874, 864, 949,
    790, 802, 778, 765, 673,
];

const MOSAIC_BGGR: [WavelengthId; 4] = [440, 530, 531, 630];
const MOSAIC_GBRG: [WavelengthId; 4] = [530, 440, 630, 531];
const MOSAIC_GRBG: [WavelengthId; 4] = [530, 630, 440, 531];
const MOSAIC_RGGB: [WavelengthId; 4] = [630, 531, 530, 440];

/// Built-in sensor mosaics, selectable by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultMosaic {
    /// 5x5 snapshot mosaic sensor
    Generic5x5,
    Bggr,
    Gbrg,
    Grbg,
    Rggb,
}

impl DefaultMosaic {
    pub const ALL: [DefaultMosaic; 5] = [
        DefaultMosaic::Generic5x5,
        DefaultMosaic::Bggr,
        DefaultMosaic::Gbrg,
        DefaultMosaic::Grbg,
        DefaultMosaic::Rggb,
    ];

    /// Id 0 is reserved for "unknown" and never resolves.
    pub fn from_id(id: i32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|default| default.id() == id)
            .ok_or(HyperspectralError::UnknownDefault(id))
    }

    pub fn id(self) -> i32 {
        match self {
            DefaultMosaic::Generic5x5 => 1,
            DefaultMosaic::Bggr => 2,
            DefaultMosaic::Gbrg => 3,
            DefaultMosaic::Grbg => 4,
            DefaultMosaic::Rggb => 5,
        }
    }

    pub fn tile_size(self) -> (usize, usize) {
        match self {
            DefaultMosaic::Generic5x5 => (5, 5),
            _ => (2, 2),
        }
    }

    pub fn wavelengths(self) -> &'static [WavelengthId] {
        match self {
            DefaultMosaic::Generic5x5 => &MOSAIC_5X5,
            DefaultMosaic::Bggr => &MOSAIC_BGGR,
            DefaultMosaic::Gbrg => &MOSAIC_GBRG,
            DefaultMosaic::Grbg => &MOSAIC_GRBG,
            DefaultMosaic::Rggb => &MOSAIC_RGGB,
        }
    }
}
