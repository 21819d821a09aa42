use thiserror::Error;

#[derive(Error, Debug)]
pub enum HyperspectralError {
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown cube layout '{0}'")]
    UnknownLayout(String),

    #[error("Missing field '{0}' in cube declaration")]
    MissingField(&'static str),

    #[error("Size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Wavelength id at position {index} is not a valid integer id: {value}")]
    TypeMismatch { index: usize, value: i64 },

    #[error("Geometry mismatch: {0}")]
    GeometryMismatch(String),

    #[error("Failed to parse '{input}': {reason}")]
    ParseError { input: String, reason: String },

    #[error("No default mosaic for id {0}")]
    UnknownDefault(i32),

    #[error("Invalid buffer size {actual} < {required}")]
    InvalidSize { actual: usize, required: usize },

    #[error("Wavelength id {requested} not found, falling back to {fallback}")]
    WavelengthNotFound { requested: u32, fallback: u32 },

    #[error("Reduction geometry has not been computed for the bound formats")]
    GeometryNotComputed,

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HyperspectralError {
    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error aborts the operation that raised it.
    ///
    /// Only a missing decode wavelength is recoverable; the decoder substitutes
    /// slot 0 and keeps going.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::WavelengthNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, HyperspectralError>;
