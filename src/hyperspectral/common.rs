//! Common utilities module
//!
//! This module contains shared utilities used across the hyperspectral transforms.

pub mod error;

pub use error::{HyperspectralError, Result};
