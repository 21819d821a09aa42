//! Text grammar for mosaics and wavelength id lists.
//!
//! Mosaic: `<w>,<h>=<row>:<row>:...`, each row `w` comma separated ids and
//! exactly `h` rows. Id lists: `id,id,id` with optional whitespace.

use tracing::{debug, error};

use crate::hyperspectral::common::error::{HyperspectralError, Result};
use crate::hyperspectral::mosaic::{MAX_WAVELENGTH_ID, TiledMosaic, WavelengthId};

/// Parses one non-negative integer token.
///
/// A value of zero is only accepted when the token is literally `0`, so
/// inputs like `00` or `+0` that a lenient integer parser would fold to zero
/// are rejected as malformed.
fn parse_id_token(token: &str, input: &str) -> Result<WavelengthId> {
    let trimmed = token.trim();

    if trimmed.is_empty() {
        return Err(HyperspectralError::parse(input, "empty value"));
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HyperspectralError::parse(
            input,
            format!("malformed integer '{}'", trimmed),
        ));
    }

    let value: u64 = trimmed.parse().map_err(|_| {
        HyperspectralError::parse(input, format!("integer '{}' is out of range", trimmed))
    })?;

    if value > u64::from(MAX_WAVELENGTH_ID) {
        return Err(HyperspectralError::parse(
            input,
            format!("integer '{}' is outside [0, {}]", trimmed, MAX_WAVELENGTH_ID),
        ));
    }
    if value == 0 && trimmed != "0" {
        return Err(HyperspectralError::parse(
            input,
            format!("no valid conversion for '{}'", trimmed),
        ));
    }

    Ok(value as WavelengthId)
}

fn parse_dimension(token: &str, name: &str, input: &str) -> Result<usize> {
    let value = parse_id_token(token, input)? as usize;
    if value == 0 {
        return Err(HyperspectralError::parse(input, format!("mosaic {} must be positive", name)));
    }
    Ok(value)
}

pub(crate) fn parse_mosaic(input: &str) -> Result<TiledMosaic> {
    let text = input.trim();

    let result = parse_mosaic_inner(text);
    if let Err(e) = &result {
        error!("Error while parsing mosaic: {}", e);
    }
    result
}

fn parse_mosaic_inner(text: &str) -> Result<TiledMosaic> {
    let (header, body) = text
        .split_once('=')
        .ok_or_else(|| HyperspectralError::parse(text, "expected '<width>,<height>='"))?;

    let (width, height) = header
        .split_once(',')
        .ok_or_else(|| HyperspectralError::parse(text, "could not parse width and height"))?;
    let width = parse_dimension(width, "width", text)?;
    let height = parse_dimension(height, "height", text)?;

    let size = width
        .checked_mul(height)
        .ok_or_else(|| HyperspectralError::parse(text, "mosaic size overflows"))?;

    let body = body.trim();
    let body = body.strip_suffix(':').unwrap_or(body);

    let rows: Vec<&str> = if body.is_empty() { Vec::new() } else { body.split(':').collect() };
    if rows.len() != height {
        return Err(HyperspectralError::parse(
            text,
            format!("expected {} rows, found {}", height, rows.len()),
        ));
    }

    // Each id needs at least one byte of body text.
    let mut wavelengths = Vec::with_capacity(size.min(body.len()));
    for (row_index, row) in rows.iter().enumerate() {
        debug!("Parsing row {}", row_index + 1);
        let before = wavelengths.len();
        for token in row.split(',') {
            wavelengths.push(parse_id_token(token, text)?);
        }
        let found = wavelengths.len() - before;
        if found != width {
            return Err(HyperspectralError::parse(
                text,
                format!("row {} has {} values, expected {}", row_index + 1, found, width),
            ));
        }
    }

    TiledMosaic::new(width, height, wavelengths)
}

/// Parses a comma separated wavelength id list such as `530, 630,440`.
///
/// A single trailing comma is tolerated.
pub fn parse_id_list(input: &str) -> Result<Vec<WavelengthId>> {
    let mut tokens: Vec<&str> = input.split(',').collect();

    if tokens.len() > 1 && tokens.last().is_some_and(|t| t.trim().is_empty()) {
        tokens.pop();
    }

    tokens
        .into_iter()
        .map(|token| parse_id_token(token, input))
        .collect()
}
